//! Keep player input on one log line.

use std::fmt::Write;

/// Cap for a whole input line or an argument string.
pub const INPUT_PREVIEW: usize = 120;
/// Cap for a single verb.
pub const VERB_PREVIEW: usize = 24;

/// Render `s` for a log line: control characters are escaped and anything
/// past `max_chars` characters is replaced by `…`.
pub fn escape_log(s: &str, max_chars: usize) -> String {
    let cut = s.char_indices().nth(max_chars).map(|(i, _)| i);
    let shown = cut.map_or(s, |i| &s[..i]);

    let mut out = String::with_capacity(shown.len() + 4);
    for ch in shown.chars() {
        push_escaped(&mut out, ch);
    }
    if cut.is_some() {
        out.push('…');
    }
    out
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        c if c.is_control() => {
            let _ = write!(out, "\\x{:02X}", c as u32);
        }
        c => out.push(c),
    }
}
