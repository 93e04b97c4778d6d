//! Audio frame type.

/// A stereo audio frame (16-bit integer).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub left: i16,
    pub right: i16,
}

impl Frame {
    pub const fn silence() -> Self {
        Self { left: 0, right: 0 }
    }

    /// Same value on both channels.
    pub const fn mono(value: i16) -> Self {
        Self {
            left: value,
            right: value,
        }
    }

    /// Convert a mono sample in [-1.0, 1.0] (clamped) to a frame.
    pub fn from_f32(value: f32) -> Self {
        Self::mono((value.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
    }

    pub fn is_silent(&self) -> bool {
        self.left == 0 && self.right == 0
    }
}
