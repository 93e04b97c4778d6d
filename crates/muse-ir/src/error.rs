//! Configuration error type.

use crate::slider::{SliderName, MAX_SELECTOR};

/// Error raised when a patch or a slider binding is invalid.
///
/// These are reported before the engine starts (or when a slider is
/// rebound between pulses); no error can occur inside a pulse.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Slider selector outside 0..=MAX_SELECTOR
    SelectorOutOfRange { slider: SliderName, selector: u8 },
    /// Tempo must be at least 1 BPM
    NonPositiveBpm,
    /// Tonic frequency must be finite and above zero
    NonPositiveTonic(f64),
    /// Slider name is not one of A-D, W-Z
    UnknownSlider(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::SelectorOutOfRange { slider, selector } => write!(
                f,
                "slider {} selector {} out of range (0-{})",
                slider, selector, MAX_SELECTOR
            ),
            ConfigError::NonPositiveBpm => write!(f, "bpm must be greater than zero"),
            ConfigError::NonPositiveTonic(hz) => {
                write!(f, "tonic frequency must be positive, got {} Hz", hz)
            }
            ConfigError::UnknownSlider(name) => {
                write!(f, "unknown slider '{}' (expected one of A-D, W-Z)", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
