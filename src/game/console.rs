//! Terminal transport: stdin lines in, notifications out.

use std::io::{self, BufRead, Write};

use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Forward stdin lines into a channel. Reads on a plain OS thread so a
/// pending read does not hold up runtime shutdown.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("stdin read failed: {}", e);
                    break;
                }
            }
        }
        debug!("stdin reader stopped");
    });
    rx
}

/// Print every notification to stdout until all notifiers are dropped.
pub fn spawn_printer(mut rx: mpsc::UnboundedReceiver<String>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let mut out = io::stdout().lock();
            if writeln!(out, "{}", msg).and_then(|_| out.flush()).is_err() {
                break;
            }
        }
    })
}
