//! The pulse engine.

use muse_ir::{ConfigError, Patch, SliderName, Temperament};
use tracing::{debug, info, trace};

use crate::machine::MachineState;
use crate::note::{encode, to_frequency, Note};
use crate::parity::parity;
use crate::shift_register::ShiftRegister;
use crate::sliders::{split_snapshot, SliderBank};

/// What happens to the shift register on [`Engine::reset`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterReset {
    /// Keep the current register contents.
    Keep,
    /// Refill the register from a new seed.
    Reseed(u64),
}

/// One Muse session: machine state, slider bindings and tuning.
///
/// All mutation happens through `pulse`, `set_slider`, `set_tonic` and
/// `reset`; callers that share an engine across threads must serialize
/// those calls.
#[derive(Clone, Debug)]
pub struct Engine {
    state: MachineState,
    sliders: SliderBank,
    tonic_hz: f64,
    temperament: Temperament,
    /// Seed the register was last filled from, if it came from a seed.
    seed: Option<u64>,
}

impl Engine {
    /// Create an engine from a validated patch.
    ///
    /// Without a seed in the patch, one is drawn from the OS and logged so the
    /// session can be replayed.
    pub fn new(patch: &Patch) -> Result<Self, ConfigError> {
        patch.validate()?;
        let seed = match patch.seed {
            Some(seed) => seed,
            None => {
                let seed: u64 = rand::random();
                info!(seed, "no register seed given, drew one");
                seed
            }
        };
        let mut engine = Self::with_register(patch, ShiftRegister::seeded(seed))?;
        engine.seed = Some(seed);
        Ok(engine)
    }

    /// Create an engine with explicit register contents; the patch seed is ignored.
    pub fn with_register(patch: &Patch, register: ShiftRegister) -> Result<Self, ConfigError> {
        patch.validate()?;
        let sliders = SliderBank::new(patch.sources()?);
        debug!(
            tonic_hz = patch.tonic_hz,
            selectors = ?sliders.selectors(),
            temperament = ?patch.temperament,
            "engine created"
        );
        Ok(Self {
            state: MachineState::new(register),
            sliders,
            tonic_hz: patch.tonic_hz,
            temperament: patch.temperament,
            seed: None,
        })
    }

    /// Advance the whole machine by one pulse and return the note.
    ///
    /// Sliders are read before anything moves. The clock advances, then
    /// both counters against the new clock value, then the parity of the
    /// theme readings is pushed into the register. The note comes from the
    /// interval readings taken before the advance.
    pub fn pulse(&mut self) -> Note {
        let snapshot = self.sliders.snapshot(&self.state);
        let (interval, theme) = split_snapshot(snapshot);

        let feedback = parity(theme);
        self.state.advance(feedback);

        let degree = encode(interval);
        let frequency = to_frequency(self.tonic_hz, degree, self.temperament);
        trace!(
            tick = self.state.clock(),
            degree,
            parity = feedback,
            frequency,
            "pulse"
        );
        Note { degree, frequency }
    }

    /// Rebind a slider; takes effect on the next pulse.
    pub fn set_slider(&mut self, slider: SliderName, selector: u8) -> Result<(), ConfigError> {
        self.sliders.set(slider, selector)?;
        debug!(%slider, selector, "slider rebound");
        Ok(())
    }

    pub fn set_tonic(&mut self, tonic_hz: f64) -> Result<(), ConfigError> {
        if !(tonic_hz.is_finite() && tonic_hz > 0.0) {
            return Err(ConfigError::NonPositiveTonic(tonic_hz));
        }
        self.tonic_hz = tonic_hz;
        Ok(())
    }

    /// Return to tick 0 with cleared counters.
    pub fn reset(&mut self, register: RegisterReset) {
        let register = match register {
            RegisterReset::Keep => *self.state.register(),
            RegisterReset::Reseed(seed) => {
                self.seed = Some(seed);
                ShiftRegister::seeded(seed)
            }
        };
        self.state.reset(register);
        debug!(seed = ?self.seed, "engine reset");
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn sliders(&self) -> &SliderBank {
        &self.sliders
    }

    pub fn tonic_hz(&self) -> f64 {
        self.tonic_hz
    }

    pub fn temperament(&self) -> Temperament {
        self.temperament
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}
