//! Item effects and the timers that release them.
//!
//! Effects are decoded from world content as a closed, tagged enum. Applying
//! one mutates the player immediately (damage, status flags) and, for timed
//! effects, spawns a tokio task that sleeps and then reports back over an
//! mpsc channel. Timer tasks never touch the player themselves: the
//! controller feeds each [`EffectEvent`] into [`EffectEngine::resolve`], which
//! keeps every mutation on one owner.
//!
//! Every timer also watches the session latch and stops as soon as the
//! session finishes.

use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::game::player::PlayerState;
use crate::game::session::{wait_finished, SessionHandle};
use crate::game::status::StatusSet;

/// One rule carried by an item. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectDescriptor {
    Blind {
        #[serde(alias = "timeoutSeconds")]
        timeout: u64,
    },
    Slow {
        #[serde(alias = "timeoutSeconds")]
        timeout: u64,
    },
    Hurt {
        damage: i32,
    },
    Bleed {
        #[serde(alias = "damagePerTick")]
        damage: i32,
        #[serde(alias = "tickLengthSeconds")]
        tick: u64,
        #[serde(alias = "timeoutSeconds")]
        timeout: u64,
    },
}

impl EffectDescriptor {
    /// Number of damage ticks a bleed produces: `floor(timeout / tick)`.
    pub fn bleed_ticks(tick: u64, timeout: u64) -> u64 {
        timeout.checked_div(tick).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BleedSeverity {
    Small,
    Moderate,
    Large,
}

impl BleedSeverity {
    pub fn from_damage(damage_per_tick: i32) -> Self {
        match damage_per_tick {
            i32::MIN..=3 => BleedSeverity::Small,
            4..=8 => BleedSeverity::Moderate,
            _ => BleedSeverity::Large,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BleedSeverity::Small => "small",
            BleedSeverity::Moderate => "moderate",
            BleedSeverity::Large => "large",
        }
    }
}

/// Messages sent from timer tasks back to the session owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectEvent {
    /// A blind or slow timer ran out.
    Release(StatusSet),
    /// One bleed interval elapsed.
    BleedTick { damage: i32 },
    /// A bleed ran all of its ticks.
    BleedEnded,
}

/// Applies effects and schedules their timers. Must be used from within a
/// tokio runtime.
#[derive(Clone, Debug)]
pub struct EffectEngine {
    events: mpsc::UnboundedSender<EffectEvent>,
    session: SessionHandle,
}

impl EffectEngine {
    pub fn new(session: SessionHandle) -> (Self, mpsc::UnboundedReceiver<EffectEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { events, session }, rx)
    }

    /// Apply `effects` in order. A fatal hurt does not stop the rest of the
    /// list from being applied; the session latch takes care of ending once.
    pub fn apply_effects(&self, player: &mut PlayerState, effects: &[EffectDescriptor]) {
        for effect in effects {
            self.apply(player, effect);
        }
    }

    /// Apply one effect. Once the session has finished only hurts still
    /// land; timed effects would have no timer to end them.
    pub fn apply(&self, player: &mut PlayerState, effect: &EffectDescriptor) {
        if !player.is_active() && !matches!(effect, EffectDescriptor::Hurt { .. }) {
            debug!("skipping {:?}: session finished", effect);
            return;
        }
        debug!("applying effect {:?}", effect);
        match *effect {
            EffectDescriptor::Hurt { damage } => {
                player.notify(format!("You took {} damage!", damage));
                player.damage(damage);
            }
            EffectDescriptor::Blind { timeout } => {
                if player.try_set_status(StatusSet::BLIND) {
                    player.notify(format!(
                        "You become blinded for the next {} seconds. Traps and items will \
                         not be described as you enter rooms, only exits.",
                        timeout
                    ));
                    self.schedule_release(StatusSet::BLIND, Duration::from_secs(timeout));
                }
            }
            EffectDescriptor::Slow { timeout } => {
                if player.try_set_status(StatusSet::SLOW) {
                    player.notify(format!(
                        "You become frozen for the next {} seconds. \
                         You will not be able to exit this room until unfrozen.",
                        timeout
                    ));
                    self.schedule_release(StatusSet::SLOW, Duration::from_secs(timeout));
                }
            }
            EffectDescriptor::Bleed {
                damage,
                tick,
                timeout,
            } => {
                let severity = BleedSeverity::from_damage(damage);
                player.notify(format!(
                    "You suffer a {} wound and start bleeding for the next {} seconds.",
                    severity.label(),
                    timeout
                ));
                let ticks = EffectDescriptor::bleed_ticks(tick, timeout);
                if ticks > 0 {
                    player.start_bleeding();
                    self.schedule_bleed(damage, Duration::from_secs(tick), ticks);
                }
            }
        }
    }

    /// Apply a timer event to the player. Events that arrive after the
    /// session finished are dropped.
    pub fn resolve(&self, player: &mut PlayerState, event: EffectEvent) {
        if !player.is_active() {
            debug!("ignoring {:?}: session finished", event);
            player.end_timed_status();
            return;
        }
        match event {
            EffectEvent::Release(flag) => {
                if !player.clear_status(flag) {
                    return;
                }
                if flag == StatusSet::BLIND {
                    player.notify("Your blindness disappears and you regain your sight.");
                } else if flag == StatusSet::SLOW {
                    player.notify("Your muscles unfreeze and you regain your movement.");
                }
            }
            EffectEvent::BleedTick { damage } => {
                player.notify(format!("You bleed for {} damage.", damage));
                player.damage(damage);
            }
            EffectEvent::BleedEnded => {
                if player.stop_bleeding() {
                    player.notify("Your wounds close and the bleeding stops.");
                }
            }
        }
    }

    fn schedule_release(&self, flag: StatusSet, delay: Duration) {
        let events = self.events.clone();
        let mut status = self.session.subscribe();
        tokio::spawn(async move {
            tokio::select! {
                _ = sleep(delay) => {
                    if events.send(EffectEvent::Release(flag)).is_err() {
                        debug!("release {:?} dropped: controller gone", flag);
                    }
                }
                _ = wait_finished(&mut status) => {
                    debug!("release {:?} cancelled: session finished", flag);
                }
            }
        });
    }

    fn schedule_bleed(&self, damage: i32, tick: Duration, ticks: u64) {
        let events = self.events.clone();
        let mut status = self.session.subscribe();
        tokio::spawn(async move {
            for n in 0..ticks {
                tokio::select! {
                    _ = sleep(tick) => {}
                    _ = wait_finished(&mut status) => {
                        debug!("bleed cancelled after {} of {} ticks", n, ticks);
                        return;
                    }
                }
                if events.send(EffectEvent::BleedTick { damage }).is_err() {
                    return;
                }
            }
            let _ = events.send(EffectEvent::BleedEnded);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_bands() {
        assert_eq!(BleedSeverity::from_damage(1), BleedSeverity::Small);
        assert_eq!(BleedSeverity::from_damage(3), BleedSeverity::Small);
        assert_eq!(BleedSeverity::from_damage(4), BleedSeverity::Moderate);
        assert_eq!(BleedSeverity::from_damage(8), BleedSeverity::Moderate);
        assert_eq!(BleedSeverity::from_damage(9), BleedSeverity::Large);
    }

    #[test]
    fn tick_count_floors() {
        assert_eq!(EffectDescriptor::bleed_ticks(1, 3), 3);
        assert_eq!(EffectDescriptor::bleed_ticks(2, 5), 2);
        assert_eq!(EffectDescriptor::bleed_ticks(4, 3), 0);
        assert_eq!(EffectDescriptor::bleed_ticks(0, 3), 0);
    }

    #[test]
    fn decodes_tagged_descriptors() {
        let json = r#"[
            {"type": "hurt", "damage": 10},
            {"type": "blind", "timeout": 5},
            {"type": "bleed", "damagePerTick": 5, "tickLengthSeconds": 1, "timeoutSeconds": 3}
        ]"#;
        let effects: Vec<EffectDescriptor> = serde_json::from_str(json).unwrap();
        assert_eq!(
            effects,
            vec![
                EffectDescriptor::Hurt { damage: 10 },
                EffectDescriptor::Blind { timeout: 5 },
                EffectDescriptor::Bleed {
                    damage: 5,
                    tick: 1,
                    timeout: 3
                },
            ]
        );
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = serde_json::from_str::<EffectDescriptor>(r#"{"type": "poison", "damage": 1}"#);
        assert!(err.is_err());
    }
}
