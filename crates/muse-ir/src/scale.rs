//! Scale table and tuning.

use serde::{Deserialize, Serialize};

/// Number of scale degrees addressable by the four interval sliders.
pub const SCALE_DEGREES: usize = 16;

/// Semitone offset of each scale degree: a major scale over two octaves.
///
/// The last degree repeats the double octave.
pub const HALF_TONES: [u8; SCALE_DEGREES] = [0, 2, 4, 5, 7, 9, 11, 12, 14, 16, 17, 19, 21, 23, 24, 24];

/// Semitone ratio used by the historical software emulation.
pub const LEGACY_SEMITONE_RATIO: f64 = 1.05946882217;

/// How a semitone offset becomes a frequency ratio.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Temperament {
    /// Exact twelfth root of two.
    #[default]
    Equal,
    /// The truncated constant `LEGACY_SEMITONE_RATIO`, for bit-exact
    /// comparison against recordings of the old emulation.
    Legacy,
}
