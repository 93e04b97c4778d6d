//! Core data types for the Muse melody generator.
//!
//! This crate defines the vocabulary shared by the engine, the
//! controller and the CLI: slider names and their bit sources, the
//! scale table, and the patch (configuration) that a session starts from.
//! It holds no machine state.

mod error;
mod patch;
mod scale;
mod slider;

pub use error::ConfigError;
pub use patch::Patch;
pub use scale::{Temperament, HALF_TONES, LEGACY_SEMITONE_RATIO, SCALE_DEGREES};
pub use slider::{
    SliderName, SliderSource, BINARY_BITS, MAX_SELECTOR, REGISTER_BITS, SLIDER_COUNT,
    TRIPLE_BITS,
};

/// A single binary digit, always 0 or 1.
pub type Bit = u8;
