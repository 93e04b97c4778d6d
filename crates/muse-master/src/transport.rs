//! Beat transport: one engine pulse per beat, rendered through the tone voice.

use muse_engine::{Engine, Frame, ToneVoice};

/// Frames in one beat at `bpm`, rounded to the nearest frame (at least 1).
pub fn frames_per_beat(sample_rate: u32, bpm: u32) -> u32 {
    let bpm = bpm.max(1) as u64;
    let frames = (sample_rate as u64 * 60 + bpm / 2) / bpm;
    frames.clamp(1, u32::MAX as u64) as u32
}

/// What one pulse produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PulseRecord {
    /// 1-based pulse number (the clock value after the pulse)
    pub pulse: u64,
    pub degree: u8,
    pub frequency: f64,
}

/// Drives an engine at a fixed tempo and renders each note for one beat.
pub struct Transport {
    engine: Engine,
    voice: ToneVoice,
    frames_per_beat: u32,
}

impl Transport {
    pub fn new(engine: Engine, sample_rate: u32, bpm: u32) -> Self {
        Self {
            engine,
            voice: ToneVoice::new(sample_rate),
            frames_per_beat: frames_per_beat(sample_rate, bpm),
        }
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.voice = self.voice.with_gain(gain);
        self
    }

    /// Pulse without rendering audio.
    pub fn step(&mut self) -> PulseRecord {
        let note = self.engine.pulse();
        PulseRecord {
            pulse: self.engine.state().clock(),
            degree: note.degree,
            frequency: note.frequency,
        }
    }

    /// Pulse and append one beat of audio to `out`.
    pub fn beat(&mut self, out: &mut Vec<Frame>) -> PulseRecord {
        let record = self.step();
        self.voice
            .render_note(record.frequency, self.frames_per_beat, out);
        record
    }

    pub fn frames_per_beat(&self) -> u32 {
        self.frames_per_beat
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muse_engine::ShiftRegister;
    use muse_ir::Patch;

    #[test]
    fn beat_length_follows_tempo() {
        assert_eq!(frames_per_beat(44100, 60), 44100);
        assert_eq!(frames_per_beat(44100, 240), 11025);
        assert_eq!(frames_per_beat(48000, 120), 24000);
        // 44100 * 60 / 7 = 378000
        assert_eq!(frames_per_beat(44100, 7), 378000);
        // 8000 * 60 / 97 = 4948.45...
        assert_eq!(frames_per_beat(8000, 97), 4948);
    }

    #[test]
    fn beat_length_never_reaches_zero() {
        assert_eq!(frames_per_beat(1, 10_000), 1);
        assert_eq!(frames_per_beat(44100, 0), 44100 * 60);
    }

    #[test]
    fn each_beat_appends_one_beats_worth_of_frames() {
        let patch = Patch::silent(220.0, 120);
        let engine = Engine::with_register(&patch, ShiftRegister::zeroed()).unwrap();
        let mut transport = Transport::new(engine, 8000, 120);
        let mut out = Vec::new();
        let first = transport.beat(&mut out);
        let second = transport.beat(&mut out);
        assert_eq!(out.len(), 8000);
        assert_eq!(first.pulse, 1);
        assert_eq!(second.pulse, 2);
        assert_eq!(second.frequency, 220.0);
    }
}
