//! Tone generator: turns each pulse's frequency into one beat of audio.
//!
//! A plain sine at a fixed gain. Every note restarts the phase and ramps
//! in and out over a few milliseconds so consecutive beats join without
//! clicks.

use core::f32::consts::TAU;

use crate::frame::Frame;

/// Output level of the reference instrument (fraction of full scale).
pub const DEFAULT_GAIN: f32 = 0.05;

/// Edge ramp length in milliseconds.
const FADE_MS: u32 = 5;

/// Single sine voice producing one note at a time.
#[derive(Clone, Debug)]
pub struct ToneVoice {
    sample_rate: u32,
    gain: f32,
    /// Phase in cycles, 0.0..1.0
    phase: f32,
    /// Phase increment per frame, in cycles
    increment: f32,
    /// Frames already rendered of the current note
    position: u32,
    /// Total frames of the current note
    length: u32,
    fade: u32,
}

impl ToneVoice {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            gain: DEFAULT_GAIN,
            phase: 0.0,
            increment: 0.0,
            position: 0,
            length: 0,
            fade: 0,
        }
    }

    /// Set the output gain (clamped to 0.0..=1.0).
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain.clamp(0.0, 1.0);
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Begin a note of `frames` length at `frequency` Hz.
    pub fn start(&mut self, frequency: f64, frames: u32) {
        self.phase = 0.0;
        self.increment = if self.sample_rate == 0 {
            0.0
        } else {
            (frequency / self.sample_rate as f64) as f32
        };
        self.position = 0;
        self.length = frames;
        let max_fade = self.sample_rate * FADE_MS / 1000;
        self.fade = max_fade.min(frames / 2);
    }

    pub fn is_active(&self) -> bool {
        self.position < self.length
    }

    /// Render one frame; silence once the note has ended.
    pub fn next_frame(&mut self) -> Frame {
        if !self.is_active() {
            return Frame::silence();
        }
        let value = libm::sinf(self.phase * TAU) * self.gain * self.envelope();
        self.phase += self.increment;
        self.phase -= libm::floorf(self.phase);
        self.position += 1;
        Frame::from_f32(value)
    }

    /// Render a whole note into `out`.
    pub fn render_note(&mut self, frequency: f64, frames: u32, out: &mut Vec<Frame>) {
        self.start(frequency, frames);
        out.reserve(frames as usize);
        while self.is_active() {
            out.push(self.next_frame());
        }
    }

    fn envelope(&self) -> f32 {
        if self.fade == 0 {
            return 1.0;
        }
        let from_start = self.position as f32 / self.fade as f32;
        let to_end = (self.length - self.position) as f32 / self.fade as f32;
        from_start.min(to_end).min(1.0)
    }
}
