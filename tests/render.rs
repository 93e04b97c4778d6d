//! Offline rendering through the controller.

use muse_master::{frames_per_beat, Controller, Patch, RenderError};
use muse_engine::Engine;
use muse_ir::SliderName;

fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[test]
fn wav_holds_one_beat_per_pulse() {
    let ctrl = Controller::new(Patch::default().with_seed(8)).unwrap();
    let wav = ctrl.render_to_wav(22050, 12).unwrap();

    let frames = frames_per_beat(22050, 240) as usize * 12;
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[8..12], b"WAVE");
    assert_eq!(u32_at(&wav, 24), 22050);
    assert_eq!(u32_at(&wav, 40) as usize, frames * 4);
    assert_eq!(wav.len(), 44 + frames * 4);
}

#[test]
fn render_is_audible_unless_gain_is_zero() {
    let mut ctrl = Controller::new(Patch::default().with_seed(8)).unwrap();
    let frames = ctrl.render_frames(8000, 4).unwrap();
    assert!(frames.iter().any(|f| !f.is_silent()));

    ctrl.set_gain(0.0);
    let frames = ctrl.render_frames(8000, 4).unwrap();
    assert!(frames.iter().all(|f| f.is_silent()));
}

#[test]
fn trace_matches_a_fresh_engine() {
    let patch = Patch::default()
        .with_seed(77)
        .with_slider(SliderName::Y, 2);
    let ctrl = Controller::new(patch.clone()).unwrap();
    let mut engine = Engine::new(&patch).unwrap();

    for record in ctrl.trace(96) {
        let note = engine.pulse();
        assert_eq!(record.pulse, engine.state().clock());
        assert_eq!(record.degree, note.degree);
        assert_eq!(record.frequency, note.frequency);
    }
}

#[test]
fn trace_follows_slider_changes() {
    let mut ctrl = Controller::new(Patch::silent(100.0, 60).with_seed(1)).unwrap();
    assert!(ctrl.trace(8).iter().all(|r| r.degree == 0));

    // A and D held high: degree 1 + 8
    ctrl.set_slider(SliderName::A, 1).unwrap();
    ctrl.set_slider(SliderName::D, 1).unwrap();
    assert!(ctrl.trace(8).iter().all(|r| r.degree == 9));
}

#[test]
fn render_streams_to_a_file() {
    let ctrl = Controller::new(Patch::default().with_seed(8)).unwrap();
    let mut file = tempfile::tempfile().unwrap();
    let frames = ctrl.render_to(&mut file, 8000, 10).unwrap();
    let len = file.metadata().unwrap().len();
    assert_eq!(len, 44 + frames as u64 * 4);
    assert_eq!(frames, frames_per_beat(8000, 240) * 10);
}

#[test]
fn unbounded_render_is_refused_before_writing() {
    let ctrl = Controller::new(Patch::default().with_seed(8)).unwrap();
    let mut out = Vec::new();
    let err = ctrl.render_to(&mut out, 44100, u64::MAX).unwrap_err();
    assert!(matches!(err, RenderError::TooLong { .. }));
    assert!(out.is_empty());
}
