//! Interval bits to scale degree to frequency.
//!
//! The four interval sliders form a little-endian 4-bit number (A is the
//! least significant bit) that indexes the two-octave major scale in
//! `HALF_TONES`. The semitone offset is then applied to the tonic.

use muse_ir::{Bit, Temperament, HALF_TONES, LEGACY_SEMITONE_RATIO};

/// One note produced by a pulse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Note {
    /// Scale degree 0-15 (0 is the tonic)
    pub degree: u8,
    /// Frequency in Hz
    pub frequency: f64,
}

/// Pack interval bits (A first) into a scale degree 0-15.
pub fn encode(interval: [Bit; 4]) -> u8 {
    interval
        .iter()
        .enumerate()
        .fold(0, |acc, (i, &b)| acc | ((b & 1) << i))
}

/// Frequency of `degree` above `tonic_hz`.
///
/// `degree` must be below 16, which `encode` guarantees.
pub fn to_frequency(tonic_hz: f64, degree: u8, temperament: Temperament) -> f64 {
    shift_semitones(tonic_hz, HALF_TONES[degree as usize], temperament)
}

/// Raise `hz` by a number of semitones.
pub fn shift_semitones(hz: f64, semitones: u8, temperament: Temperament) -> f64 {
    let semitones = semitones as f64;
    match temperament {
        Temperament::Equal => hz * libm::exp2(semitones / 12.0),
        Temperament::Legacy => hz * libm::pow(LEGACY_SEMITONE_RATIO, semitones),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn encode_is_little_endian() {
        assert_eq!(encode([0, 0, 0, 0]), 0);
        assert_eq!(encode([1, 0, 0, 0]), 1);
        assert_eq!(encode([0, 1, 0, 0]), 2);
        assert_eq!(encode([0, 0, 0, 1]), 8);
        assert_eq!(encode([1, 1, 1, 1]), 15);
    }

    #[test]
    fn encode_is_a_bijection_onto_sixteen_degrees() {
        let mut seen = [false; 16];
        for n in 0u8..16 {
            let bits = [n & 1, (n >> 1) & 1, (n >> 2) & 1, (n >> 3) & 1];
            let degree = encode(bits);
            assert_eq!(degree, n);
            assert!(!seen[degree as usize]);
            seen[degree as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn degree_zero_is_the_tonic() {
        for tonic in [55.0, 200.0, 261.6, 440.0, 1234.5] {
            assert_eq!(to_frequency(tonic, 0, Temperament::Equal), tonic);
            assert_eq!(to_frequency(tonic, 0, Temperament::Legacy), tonic);
        }
    }

    #[test]
    fn twelve_semitones_is_one_octave() {
        for tonic in [100.0, 261.6, 440.0] {
            assert!(close(shift_semitones(tonic, 12, Temperament::Equal), tonic * 2.0));
        }
    }

    #[test]
    fn degree_seven_is_one_octave_up() {
        // HALF_TONES[7] == 12
        for tonic in [100.0, 261.6, 440.0] {
            assert!(close(to_frequency(tonic, 7, Temperament::Equal), tonic * 2.0));
        }
    }

    #[test]
    fn table_index_twelve_is_twenty_one_semitones() {
        // HALF_TONES[12] == 21
        let f = to_frequency(200.0, 12, Temperament::Equal);
        assert!(close(f, 200.0 * libm::exp2(21.0 / 12.0)));
    }

    #[test]
    fn top_two_degrees_are_the_double_octave() {
        let f14 = to_frequency(110.0, 14, Temperament::Equal);
        let f15 = to_frequency(110.0, 15, Temperament::Equal);
        assert!(close(f14, 440.0));
        assert_eq!(f14, f15);
    }

    #[test]
    fn legacy_ratio_stays_within_half_a_cent_of_equal() {
        for degree in 0..16u8 {
            let eq = to_frequency(261.6, degree, Temperament::Equal);
            let legacy = to_frequency(261.6, degree, Temperament::Legacy);
            let cents = 1200.0 * libm::log2(legacy / eq);
            assert!(cents.abs() < 0.5, "degree {} off by {} cents", degree, cents);
        }
    }

    #[test]
    fn legacy_matches_literal_constant() {
        let expected = 200.0 * 1.05946882217f64.powi(4);
        assert!(close(to_frequency(200.0, 2, Temperament::Legacy), expected));
    }
}
