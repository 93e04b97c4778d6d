//! Audio output backends for the Muse melody generator.
//!
//! The engine only produces frames; these backends move them to a sound
//! device.

mod cpal_backend;
mod traits;

pub use cpal_backend::CpalOutput;
pub use traits::{AudioError, AudioOutput};
