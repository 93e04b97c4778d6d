//! 31-stage shift register fed by the parity bit.

use muse_ir::{Bit, REGISTER_BITS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fixed-length bit queue. Stage 0 holds the newest bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShiftRegister {
    bits: [Bit; REGISTER_BITS],
}

impl ShiftRegister {
    /// Fill every stage with an independent random bit from `seed`.
    ///
    /// The same seed always produces the same register.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut bits = [0; REGISTER_BITS];
        for bit in bits.iter_mut() {
            *bit = rng.gen_range(0..=1);
        }
        Self { bits }
    }

    /// Build from explicit stage values (stage 0 first). Non-zero means 1.
    pub fn from_bits(bits: [Bit; REGISTER_BITS]) -> Self {
        Self {
            bits: bits.map(|b| (b != 0) as Bit),
        }
    }

    pub const fn zeroed() -> Self {
        Self {
            bits: [0; REGISTER_BITS],
        }
    }

    /// Push `bit` in at stage 0; the bit in the last stage falls off.
    pub fn advance(&mut self, bit: Bit) {
        self.bits.copy_within(..REGISTER_BITS - 1, 1);
        self.bits[0] = bit & 1;
    }

    pub fn bit(&self, stage: usize) -> Bit {
        self.bits[stage]
    }

    pub fn bits(&self) -> &[Bit; REGISTER_BITS] {
        &self.bits
    }

    pub const fn len(&self) -> usize {
        REGISTER_BITS
    }

    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl Default for ShiftRegister {
    fn default() -> Self {
        Self::zeroed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_pushes_front_and_drops_back() {
        let mut bits = [0; REGISTER_BITS];
        bits[REGISTER_BITS - 1] = 1;
        bits[3] = 1;
        let mut reg = ShiftRegister::from_bits(bits);

        reg.advance(1);

        assert_eq!(reg.bit(0), 1);
        assert_eq!(reg.bit(4), 1);
        // the old last stage fell off, the old stage 29 moved into its place
        assert_eq!(reg.bit(REGISTER_BITS - 1), 0);
        assert_eq!(reg.bits().iter().filter(|&&b| b == 1).count(), 2);
    }

    #[test]
    fn length_never_changes() {
        let mut reg = ShiftRegister::seeded(3);
        for i in 0..1000 {
            reg.advance((i % 3 == 0) as Bit);
            assert_eq!(reg.bits().len(), REGISTER_BITS);
        }
        assert_eq!(reg.len(), 31);
    }

    #[test]
    fn bit_takes_31_pulses_to_fall_off() {
        let mut reg = ShiftRegister::zeroed();
        reg.advance(1);
        for stage in 1..REGISTER_BITS {
            reg.advance(0);
            assert_eq!(reg.bit(stage), 1);
        }
        reg.advance(0);
        assert!(reg.bits().iter().all(|&b| b == 0));
    }

    #[test]
    fn same_seed_same_register() {
        assert_eq!(ShiftRegister::seeded(42), ShiftRegister::seeded(42));
    }

    #[test]
    fn seeded_register_holds_only_bits() {
        let reg = ShiftRegister::seeded(1234);
        assert!(reg.bits().iter().all(|&b| b <= 1));
    }

    #[test]
    fn seeds_are_not_degenerate() {
        // a random 31-bit fill is all-zero with probability 2^-31
        let any_set = (0..8u64).any(|seed| ShiftRegister::seeded(seed).bits().contains(&1));
        assert!(any_set);
    }

    #[test]
    fn from_bits_normalizes_to_zero_or_one() {
        let reg = ShiftRegister::from_bits([7; REGISTER_BITS]);
        assert!(reg.bits().iter().all(|&b| b == 1));
    }
}
