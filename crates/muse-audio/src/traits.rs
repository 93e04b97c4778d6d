//! Audio output trait and error types.

use muse_engine::Frame;

/// Error type for audio operations.
#[derive(Debug)]
pub enum AudioError {
    /// Failed to initialize audio device
    DeviceInit(String),
    /// Failed to create audio stream
    StreamCreate(String),
    /// Playback error
    Playback(String),
    /// No audio device available
    NoDevice,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::DeviceInit(msg) => write!(f, "device init error: {}", msg),
            AudioError::StreamCreate(msg) => write!(f, "stream create error: {}", msg),
            AudioError::Playback(msg) => write!(f, "playback error: {}", msg),
            AudioError::NoDevice => write!(f, "no audio output device available"),
        }
    }
}

impl std::error::Error for AudioError {}

/// A sink for rendered frames, paced by the device it feeds.
pub trait AudioOutput {
    fn sample_rate(&self) -> u32;

    /// Queue frames for output, blocking until every frame has been taken.
    ///
    /// Fails if the output is not running, since nothing would drain it.
    fn write(&mut self, frames: &[Frame]) -> Result<(), AudioError>;

    fn start(&mut self) -> Result<(), AudioError>;

    fn stop(&mut self) -> Result<(), AudioError>;
}
