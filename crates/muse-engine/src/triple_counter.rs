//! Two-bit counter on a modulo-3 schedule.
//!
//! Bit `p` toggles on every tick divisible by `3 * (p + 1)`. There is no
//! clear condition.

use muse_ir::{Bit, TRIPLE_BITS};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TripleCounter {
    bits: [Bit; TRIPLE_BITS],
}

impl TripleCounter {
    pub const fn new() -> Self {
        Self {
            bits: [0; TRIPLE_BITS],
        }
    }

    /// Update for the given (already incremented) clock value.
    pub fn advance(&mut self, clock: u64) {
        for (p, bit) in self.bits.iter_mut().enumerate() {
            if clock % (3 * (p as u64 + 1)) == 0 {
                *bit ^= 1;
            }
        }
    }

    pub fn reset(&mut self) {
        self.bits = [0; TRIPLE_BITS];
    }

    pub fn bit(&self, p: usize) -> Bit {
        self.bits[p]
    }

    pub fn bits(&self) -> [Bit; TRIPLE_BITS] {
        self.bits
    }
}
