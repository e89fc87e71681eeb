//! The single player of a session: health, status flags and inventory.

use log::debug;

use crate::game::session::{FinishReason, Notifier, SessionHandle};
use crate::game::status::StatusSet;
use crate::game::world::Item;

#[derive(Debug)]
pub struct PlayerState {
    health: i32,
    status: StatusSet,
    /// Number of bleed effects still ticking; BLEEDING is set while non-zero.
    bleeds: u32,
    inventory: Vec<Item>,
    session: SessionHandle,
}

impl PlayerState {
    pub fn new(base_hp: i32, session: SessionHandle) -> Self {
        Self {
            health: base_hp,
            status: StatusSet::empty(),
            bleeds: 0,
            inventory: Vec::new(),
            session,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    /// Set health and run the death check. Dropping below zero finishes the
    /// session; the session latch makes repeated deaths a no-op.
    pub fn set_health(&mut self, value: i32) {
        debug!("health {} -> {}", self.health, value);
        self.health = value;
        if value < 0 {
            self.finish(FinishReason::Died);
        }
    }

    /// Finish the session and drop every timed flag: the latch cancels the
    /// timers that would have cleared them.
    pub fn finish(&mut self, reason: FinishReason) -> bool {
        let first = self.session.finish(reason);
        self.end_timed_status();
        first
    }

    pub fn damage(&mut self, amount: i32) {
        self.set_health(self.health.saturating_sub(amount));
    }

    pub fn status(&self) -> StatusSet {
        self.status
    }

    /// False once the player died or the session ended for any other reason.
    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn notifier(&self) -> &Notifier {
        self.session.notifier()
    }

    pub fn notify(&self, msg: impl Into<String>) {
        self.session.notifier().notify(msg);
    }

    /// Set `flag` unless it is already present. Returns whether it was newly set.
    pub(crate) fn try_set_status(&mut self, flag: StatusSet) -> bool {
        if self.status.contains(flag) {
            return false;
        }
        self.status.insert(flag);
        debug!("status now {:?}", self.status.labels());
        true
    }

    /// Clear `flag`. Returns whether it was present.
    pub(crate) fn clear_status(&mut self, flag: StatusSet) -> bool {
        let was_set = self.status.contains(flag);
        self.status.remove(flag);
        was_set
    }

    pub(crate) fn end_timed_status(&mut self) {
        self.bleeds = 0;
        self.status
            .remove(StatusSet::BLIND | StatusSet::SLOW | StatusSet::BLEEDING);
    }

    pub(crate) fn start_bleeding(&mut self) {
        self.bleeds += 1;
        self.status.insert(StatusSet::BLEEDING);
    }

    /// Returns `true` when the last running bleed ended.
    pub(crate) fn stop_bleeding(&mut self) -> bool {
        self.bleeds = self.bleeds.saturating_sub(1);
        if self.bleeds == 0 {
            return self.clear_status(StatusSet::BLEEDING);
        }
        false
    }

    pub fn inventory(&self) -> &[Item] {
        &self.inventory
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.inventory.iter().any(|item| item.name == name)
    }

    pub fn add_item(&mut self, item: Item) {
        self.notify(format!("You picked up a {}!", item.name));
        self.inventory.push(item);
    }

    /// Remove and return the first inventory item called `name`.
    pub fn take_item(&mut self, name: &str) -> Option<Item> {
        let pos = self.inventory.iter().position(|item| item.name == name)?;
        Some(self.inventory.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(hp: i32) -> (PlayerState, tokio::sync::mpsc::UnboundedReceiver<String>) {
        let (notifier, rx) = Notifier::channel();
        (PlayerState::new(hp, SessionHandle::new(notifier)), rx)
    }

    #[test]
    fn zero_health_is_still_alive() {
        let (mut p, _rx) = player(10);
        p.damage(10);
        assert_eq!(p.health(), 0);
        assert!(p.is_active());
        p.damage(1);
        assert!(!p.is_active());
        assert_eq!(p.session().reason(), Some(FinishReason::Died));
    }

    #[test]
    fn death_clears_timed_flags() {
        let (mut p, _rx) = player(1);
        p.try_set_status(StatusSet::BLIND);
        p.start_bleeding();
        p.start_bleeding();
        p.damage(5);
        assert!(!p.is_active());
        assert_eq!(p.status(), StatusSet::empty());
        assert!(!p.stop_bleeding());
    }

    #[test]
    fn overlapping_bleeds_keep_flag_until_last_ends() {
        let (mut p, _rx) = player(10);
        p.start_bleeding();
        p.start_bleeding();
        assert!(!p.stop_bleeding());
        assert!(p.status().is_bleeding());
        assert!(p.stop_bleeding());
        assert!(!p.status().is_bleeding());
    }
}
