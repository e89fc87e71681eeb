//! Player status flags.

use bitflags::bitflags;

bitflags! {
    /// Conditions currently affecting the player.
    ///
    /// A flag is only ever set while the timer that will clear it is alive, so
    /// checking the set is enough to know whether an effect is still running.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct StatusSet: u8 {
        /// Items are not described on room entry.
        const BLIND    = 1 << 0;
        /// The player cannot leave the current room.
        const SLOW     = 1 << 1;
        /// At least one damage-over-time effect is ticking.
        const BLEEDING = 1 << 2;
    }
}

impl StatusSet {
    pub fn is_blind(&self) -> bool {
        self.contains(StatusSet::BLIND)
    }

    pub fn is_slow(&self) -> bool {
        self.contains(StatusSet::SLOW)
    }

    pub fn is_bleeding(&self) -> bool {
        self.contains(StatusSet::BLEEDING)
    }

    /// Human-readable names of the active flags, in declaration order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.iter_names()
            .map(|(name, _)| match name {
                "BLIND" => "blind",
                "SLOW" => "slow",
                _ => "bleeding",
            })
            .collect()
    }
}
