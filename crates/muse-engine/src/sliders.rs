//! The eight slider bindings.

use muse_ir::{Bit, ConfigError, SliderName, SliderSource, SLIDER_COUNT};

use crate::machine::MachineState;

/// Current source of every slider, indexed by `SliderName::index()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SliderBank {
    sources: [SliderSource; SLIDER_COUNT],
}

impl SliderBank {
    pub fn new(sources: [SliderSource; SLIDER_COUNT]) -> Self {
        Self { sources }
    }

    /// Rebind one slider. On error the previous binding stays.
    pub fn set(&mut self, slider: SliderName, selector: u8) -> Result<(), ConfigError> {
        self.sources[slider.index()] = SliderSource::from_selector(slider, selector)?;
        Ok(())
    }

    pub fn source(&self, slider: SliderName) -> SliderSource {
        self.sources[slider.index()]
    }

    pub fn selectors(&self) -> [u8; SLIDER_COUNT] {
        self.sources.map(SliderSource::selector)
    }

    /// Read every slider against `state`, in A-D, W-Z order.
    pub fn snapshot(&self, state: &MachineState) -> [Bit; SLIDER_COUNT] {
        self.sources.map(|source| state.read(source))
    }
}

/// Split a snapshot into its interval (A-D) and theme (W-Z) halves.
pub fn split_snapshot(snapshot: [Bit; SLIDER_COUNT]) -> ([Bit; 4], [Bit; 4]) {
    let [a, b, c, d, w, x, y, z] = snapshot;
    ([a, b, c, d], [w, x, y, z])
}
