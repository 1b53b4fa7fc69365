//! Fixed-interval work on the server tick.

/// Fires every `interval` server ticks, first after one full interval.
///
/// An interval of zero never fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedule {
    interval: u64,
}

impl TickSchedule {
    /// A schedule with the given period in ticks.
    pub const fn every(interval: u64) -> Self {
        Self { interval }
    }

    /// The period in ticks.
    pub const fn interval(&self) -> u64 {
        self.interval
    }

    /// Whether work is due on server tick `tick`.
    pub const fn fires(&self, tick: u64) -> bool {
        if tick == 0 {
            return false;
        }
        matches!(tick.checked_rem(self.interval), Some(0))
    }
}
