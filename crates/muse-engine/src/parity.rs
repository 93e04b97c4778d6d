//! Feedback bit for the shift register.

use muse_ir::Bit;

/// Sum of the theme bits modulo 2: 0 for an even count of ones, 1 for odd.
pub fn parity(theme: [Bit; 4]) -> Bit {
    theme.iter().fold(0, |acc, &b| acc ^ (b & 1))
}
