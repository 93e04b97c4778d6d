//! Headless controller for the Muse melody generator.
//!
//! Provides one API for tracing, offline rendering and real-time playback
//! that the CLI (or any other front end) can share.

mod transport;
mod wav;

use muse_audio::CpalOutput;
use muse_engine::Engine;
use muse_ir::{SliderName, SLIDER_COUNT};
use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, error, info, warn};

// Re-export common types so callers don't need muse-ir/muse-engine directly.
pub use muse_audio::{AudioError, AudioOutput};
pub use muse_engine::{Frame, Note, RegisterReset, DEFAULT_GAIN};
pub use muse_ir::{ConfigError, Patch, Temperament};

pub use transport::{frames_per_beat, PulseRecord, Transport};
pub use wav::{frames_to_wav, write_frames, write_header, write_wav, MAX_WAV_FRAMES};

/// Frames handed to the audio output per write; stop requests are seen
/// between writes.
const WRITE_CHUNK: usize = 512;

/// Why an offline render was refused or failed.
#[derive(Debug)]
pub enum RenderError {
    ZeroSampleRate,
    /// More audio than one WAV file can hold
    TooLong { pulses: u64, max_pulses: u64 },
    Io(std::io::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ZeroSampleRate => write!(f, "sample rate must be positive"),
            RenderError::TooLong { pulses, max_pulses } => write!(
                f,
                "{} pulses do not fit in one WAV file (at most {} at this rate and tempo)",
                pulses, max_pulses
            ),
            RenderError::Io(e) => write!(f, "write failed: {}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}

/// Where real-time playback currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackPosition {
    /// Pulses played so far
    pub pulse: u64,
    /// Scale degree of the note sounding now
    pub degree: u8,
}

/// Headless Muse controller: owns the patch and the session engine.
///
/// Tracing, rendering and playback each start from a copy of the session
/// engine, so they always begin at the session's current state.
pub struct Controller {
    patch: Patch,
    engine: Engine,
    gain: f32,
    playback: Option<PlaybackHandle>,
}

/// Cross-thread view of a running playback lane.
///
/// The playback thread owns its engine outright; the controller only
/// talks to it through these atomics, and slider changes are picked up
/// between pulses.
struct PlaybackHandle {
    stop_signal: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    pulses: Arc<AtomicU64>,
    degree: Arc<AtomicU8>,
    selectors: Arc<[AtomicU8; SLIDER_COUNT]>,
    thread: Option<JoinHandle<Result<(), AudioError>>>,
}

impl Controller {
    /// Validate `patch` and build the session engine.
    ///
    /// If the patch has no seed, the drawn seed is written back into the
    /// stored patch so every later render replays the same register.
    pub fn new(patch: Patch) -> Result<Self, ConfigError> {
        let engine = Engine::new(&patch)?;
        let patch = Patch {
            seed: engine.seed(),
            ..patch
        };
        info!(
            tonic_hz = patch.tonic_hz,
            bpm = patch.bpm,
            seed = ?patch.seed,
            "controller ready"
        );
        Ok(Self {
            patch,
            engine,
            gain: DEFAULT_GAIN,
            playback: None,
        })
    }

    pub fn patch(&self) -> &Patch {
        &self.patch
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Output level for rendering and playback, 0.0-1.0.
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
    }

    // --- Session control ---

    /// Rebind a slider. While playing, the new binding reaches the playback
    /// lane before its next pulse.
    pub fn set_slider(&mut self, slider: SliderName, selector: u8) -> Result<(), ConfigError> {
        self.patch.set_selector(slider, selector)?;
        self.engine.set_slider(slider, selector)?;
        if let Some(pb) = &self.playback {
            pb.selectors[slider.index()].store(selector, Ordering::Relaxed);
        }
        Ok(())
    }

    /// Reset the session engine. Does not affect a running playback lane.
    pub fn reset(&mut self, register: RegisterReset) {
        self.engine.reset(register);
        if let RegisterReset::Reseed(seed) = register {
            self.patch.seed = Some(seed);
        }
    }

    // --- Offline ---

    /// Lazily pulse a copy of the session engine `pulses` times.
    pub fn pulse_records(&self, pulses: u64) -> impl Iterator<Item = PulseRecord> {
        let mut transport = self.transport(1);
        (0..pulses).map(move |_| transport.step())
    }

    /// Collected form of [`Controller::pulse_records`].
    pub fn trace(&self, pulses: u64) -> Vec<PulseRecord> {
        self.pulse_records(pulses).collect()
    }

    /// Frames a render of `pulses` beats needs, if one WAV file can hold it.
    pub fn render_length(&self, sample_rate: u32, pulses: u64) -> Result<u32, RenderError> {
        if sample_rate == 0 {
            return Err(RenderError::ZeroSampleRate);
        }
        let per_beat = frames_per_beat(sample_rate, self.patch.bpm) as u64;
        pulses
            .checked_mul(per_beat)
            .filter(|&frames| frames <= MAX_WAV_FRAMES as u64)
            .map(|frames| frames as u32)
            .ok_or(RenderError::TooLong {
                pulses,
                max_pulses: MAX_WAV_FRAMES as u64 / per_beat,
            })
    }

    /// Render `pulses` beats as a WAV stream into `w`, one beat at a time.
    ///
    /// Returns the number of frames written.
    pub fn render_to(
        &self,
        w: &mut impl Write,
        sample_rate: u32,
        pulses: u64,
    ) -> Result<u32, RenderError> {
        let frame_count = self.render_length(sample_rate, pulses)?;
        wav::write_header(w, frame_count, sample_rate)?;

        let mut transport = self.transport(sample_rate);
        let mut beat = Vec::with_capacity(transport.frames_per_beat() as usize);
        for _ in 0..pulses {
            beat.clear();
            transport.beat(&mut beat);
            wav::write_frames(w, &beat)?;
        }
        debug!(pulses, frames = frame_count, "offline render done");
        Ok(frame_count)
    }

    /// Render `pulses` beats of audio into memory.
    pub fn render_frames(&self, sample_rate: u32, pulses: u64) -> Result<Vec<Frame>, RenderError> {
        let frame_count = self.render_length(sample_rate, pulses)?;
        let mut transport = self.transport(sample_rate);
        let mut frames = Vec::with_capacity(frame_count as usize);
        for _ in 0..pulses {
            transport.beat(&mut frames);
        }
        Ok(frames)
    }

    pub fn render_to_wav(&self, sample_rate: u32, pulses: u64) -> Result<Vec<u8>, RenderError> {
        let mut buf = Vec::new();
        self.render_to(&mut buf, sample_rate, pulses)?;
        Ok(buf)
    }

    fn transport(&self, sample_rate: u32) -> Transport {
        Transport::new(self.engine.clone(), sample_rate, self.patch.bpm).with_gain(self.gain)
    }

    // --- Real-time playback ---

    /// Start playing on the default audio device, stopping after
    /// `max_pulses` if given.
    ///
    /// Returns once the device is open and running; a device that cannot
    /// be opened is reported here.
    pub fn play(&mut self, max_pulses: Option<u64>) -> Result<(), AudioError> {
        self.play_on(max_pulses, open_default_output)
    }

    /// Start playing on the output built by `open`, which runs on the
    /// playback thread.
    pub fn play_on<O, F>(&mut self, max_pulses: Option<u64>, open: F) -> Result<(), AudioError>
    where
        O: AudioOutput + 'static,
        F: FnOnce() -> Result<O, AudioError> + Send + 'static,
    {
        self.stop()?;

        let stop_signal = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        let pulses = Arc::new(AtomicU64::new(0));
        let degree = Arc::new(AtomicU8::new(0));
        let selectors = Arc::new(self.patch.sliders.map(AtomicU8::new));

        let lane = PlaybackLane {
            engine: self.engine.clone(),
            bpm: self.patch.bpm,
            gain: self.gain,
            max_pulses,
            stop_signal: stop_signal.clone(),
            finished: finished.clone(),
            pulses: pulses.clone(),
            degree: degree.clone(),
            selectors: selectors.clone(),
        };
        let (ready_tx, ready_rx) = mpsc::channel();
        let thread = std::thread::spawn(move || lane.run(open, ready_tx));

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                if thread.join().is_err() {
                    error!("playback thread panicked");
                }
                return Err(e);
            }
            Err(_) => {
                return Err(match thread.join() {
                    Ok(Err(e)) => e,
                    _ => AudioError::Playback("playback thread exited before starting".into()),
                });
            }
        }

        self.playback = Some(PlaybackHandle {
            stop_signal,
            finished,
            pulses,
            degree,
            selectors,
            thread: Some(thread),
        });
        Ok(())
    }

    /// Stop playback and wait for the lane; reports an output failure that
    /// ended playback early.
    pub fn stop(&mut self) -> Result<(), AudioError> {
        let Some(mut pb) = self.playback.take() else {
            return Ok(());
        };
        pb.stop_signal.store(true, Ordering::Relaxed);
        match pb.thread.take().map(JoinHandle::join) {
            Some(Ok(result)) => result,
            Some(Err(_)) => Err(AudioError::Playback("playback thread panicked".into())),
            None => Ok(()),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| !p.finished.load(Ordering::Relaxed))
    }

    pub fn is_finished(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| p.finished.load(Ordering::Relaxed))
    }

    pub fn position(&self) -> Option<PlaybackPosition> {
        let pb = self.playback.as_ref()?;
        if pb.finished.load(Ordering::Relaxed) {
            return None;
        }
        Some(PlaybackPosition {
            pulse: pb.pulses.load(Ordering::Relaxed),
            degree: pb.degree.load(Ordering::Relaxed),
        })
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!(%e, "playback ended with an error");
        }
    }
}

fn open_default_output() -> Result<CpalOutput, AudioError> {
    let (mut output, consumer) = CpalOutput::new()?;
    output.build_stream(consumer)?;
    output.start()?;
    Ok(output)
}

/// Everything the playback thread owns.
struct PlaybackLane {
    engine: Engine,
    bpm: u32,
    gain: f32,
    max_pulses: Option<u64>,
    stop_signal: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    pulses: Arc<AtomicU64>,
    degree: Arc<AtomicU8>,
    selectors: Arc<[AtomicU8; SLIDER_COUNT]>,
}

impl PlaybackLane {
    /// Open the output, report that on `ready`, then play until stopped.
    ///
    /// An open failure is returned through `ready` only.
    fn run<O, F>(self, open: F, ready: Sender<Result<(), AudioError>>) -> Result<(), AudioError>
    where
        O: AudioOutput,
        F: FnOnce() -> Result<O, AudioError>,
    {
        let mut output = match open() {
            Ok(output) => output,
            Err(e) => {
                self.finished.store(true, Ordering::Relaxed);
                // play_on is blocked on the receiver
                let _ = ready.send(Err(e));
                return Ok(());
            }
        };
        let _ = ready.send(Ok(()));

        let played = self.play_beats(&mut output);
        if let Err(e) = &played {
            error!(%e, "audio output failed");
        }
        let stopped = output.stop();
        if let Err(e) = &stopped {
            warn!(%e, "audio stream did not stop cleanly");
        }
        info!(pulses = self.pulses.load(Ordering::Relaxed), "playback finished");
        self.finished.store(true, Ordering::Relaxed);
        played.and(stopped)
    }

    fn play_beats<O: AudioOutput>(&self, output: &mut O) -> Result<(), AudioError> {
        let sample_rate = output.sample_rate();
        let mut transport =
            Transport::new(self.engine.clone(), sample_rate, self.bpm).with_gain(self.gain);
        let mut frames = Vec::with_capacity(transport.frames_per_beat() as usize);

        while !self.stop_signal.load(Ordering::Relaxed)
            && self
                .max_pulses
                .map_or(true, |max| self.pulses.load(Ordering::Relaxed) < max)
        {
            self.apply_slider_changes(transport.engine_mut());

            frames.clear();
            let record = transport.beat(&mut frames);
            self.degree.store(record.degree, Ordering::Relaxed);
            self.pulses.store(record.pulse, Ordering::Relaxed);

            for chunk in frames.chunks(WRITE_CHUNK) {
                if self.stop_signal.load(Ordering::Relaxed) {
                    break;
                }
                output.write(chunk)?;
            }
        }

        // let the device drain the last note before pausing it
        let silence = [Frame::silence(); WRITE_CHUNK];
        let mut remaining = (sample_rate / 10) as usize;
        while remaining > 0 {
            let n = remaining.min(WRITE_CHUNK);
            output.write(&silence[..n])?;
            remaining -= n;
        }
        Ok(())
    }

    fn apply_slider_changes(&self, engine: &mut Engine) {
        let current = engine.sliders().selectors();
        for name in SliderName::ALL {
            let wanted = self.selectors[name.index()].load(Ordering::Relaxed);
            if wanted != current[name.index()] {
                // values were validated by the controller before being stored
                if let Err(e) = engine.set_slider(name, wanted) {
                    warn!(%e, "ignoring slider change");
                }
            }
        }
    }
}
