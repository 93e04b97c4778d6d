//! Five-bit counter driven by the clock.
//!
//! Bit `p` toggles on every tick divisible by `2^p`, and the whole vector
//! clears on the tick after it reads all ones. Bits 0 and 1 both fire on
//! even ticks, so this is not a textbook ripple counter; downstream melodies
//! depend on exactly this sequence, which clears to zero every 32 ticks.

use muse_ir::{Bit, BINARY_BITS};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BinaryCounter {
    bits: [Bit; BINARY_BITS],
}

impl BinaryCounter {
    pub const fn new() -> Self {
        Self {
            bits: [0; BINARY_BITS],
        }
    }

    /// Update for the given (already incremented) clock value.
    pub fn advance(&mut self, clock: u64) {
        if self.bits.iter().all(|&b| b == 1) {
            self.bits = [0; BINARY_BITS];
            return;
        }
        for (p, bit) in self.bits.iter_mut().enumerate() {
            if clock % (1u64 << p) == 0 {
                *bit ^= 1;
            }
        }
    }

    pub fn reset(&mut self) {
        self.bits = [0; BINARY_BITS];
    }

    /// Bit `p` (0-4). Panics on an index past the counter.
    pub fn bit(&self, p: usize) -> Bit {
        self.bits[p]
    }

    pub fn bits(&self) -> [Bit; BINARY_BITS] {
        self.bits
    }
}
