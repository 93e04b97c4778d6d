//! Pulse clock: the single time base read by both counters.

/// Monotonic pulse counter, starting at 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Clock {
    ticks: u64,
}

impl Clock {
    pub const fn new() -> Self {
        Self { ticks: 0 }
    }

    /// Advance by exactly one tick.
    pub fn pulse(&mut self) {
        self.ticks += 1;
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }

    /// Current tick count.
    pub const fn value(self) -> u64 {
        self.ticks
    }
}
