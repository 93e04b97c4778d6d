//! Shared machine state read by every slider.

use muse_ir::{Bit, SliderSource};

use crate::binary_counter::BinaryCounter;
use crate::clock::Clock;
use crate::shift_register::ShiftRegister;
use crate::triple_counter::TripleCounter;

/// Clock, both counters and the shift register of one session.
///
/// Sliders hold no state of their own; they resolve against this
/// context through [`MachineState::read`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineState {
    pub(crate) clock: Clock,
    pub(crate) binary: BinaryCounter,
    pub(crate) triple: TripleCounter,
    pub(crate) register: ShiftRegister,
}

impl MachineState {
    pub fn new(register: ShiftRegister) -> Self {
        Self {
            clock: Clock::new(),
            binary: BinaryCounter::new(),
            triple: TripleCounter::new(),
            register,
        }
    }

    /// Resolve a slider source to the bit it currently points at.
    pub fn read(&self, source: SliderSource) -> Bit {
        match source {
            SliderSource::Off => 0,
            SliderSource::On => 1,
            SliderSource::Binary(p) => self.binary.bit(p as usize),
            SliderSource::Triple(p) => self.triple.bit(p as usize),
            SliderSource::Shift(p) => self.register.bit(p as usize),
        }
    }

    /// Clock, then counters (against the new clock value), then the register.
    pub(crate) fn advance(&mut self, parity: Bit) {
        self.clock.pulse();
        let now = self.clock.value();
        self.binary.advance(now);
        self.triple.advance(now);
        self.register.advance(parity);
    }

    /// Back to tick 0 with cleared counters; the register is replaced.
    pub(crate) fn reset(&mut self, register: ShiftRegister) {
        self.clock.reset();
        self.binary.reset();
        self.triple.reset();
        self.register = register;
    }

    pub fn clock(&self) -> u64 {
        self.clock.value()
    }

    pub fn binary(&self) -> &BinaryCounter {
        &self.binary
    }

    pub fn triple(&self) -> &TripleCounter {
        &self.triple
    }

    pub fn register(&self) -> &ShiftRegister {
        &self.register
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muse_ir::{SliderName, MAX_SELECTOR, REGISTER_BITS};

    fn source(selector: u8) -> SliderSource {
        SliderSource::from_selector(SliderName::A, selector).unwrap()
    }

    #[test]
    fn constants_ignore_state() {
        let state = MachineState::new(ShiftRegister::seeded(9));
        assert_eq!(state.read(SliderSource::Off), 0);
        assert_eq!(state.read(SliderSource::On), 1);
    }

    #[test]
    fn every_selector_reads_a_bit() {
        let mut state = MachineState::new(ShiftRegister::seeded(5));
        for pulse in 0..64u8 {
            for selector in 0..=MAX_SELECTOR {
                assert!(state.read(source(selector)) <= 1);
            }
            state.advance(pulse & 1);
        }
    }

    #[test]
    fn selectors_address_the_documented_bits() {
        let mut bits = [0; REGISTER_BITS];
        bits[0] = 1;
        bits[30] = 1;
        let mut state = MachineState::new(ShiftRegister::from_bits(bits));
        // tick 3: binary [1,1,0,0,0], triple [1,0]
        for _ in 0..3 {
            state.advance(0);
        }
        // stage 0's one is now at stage 3; stage 30's fell off on the first push
        assert_eq!(state.read(source(2)), 1);
        assert_eq!(state.read(source(3)), 1);
        assert_eq!(state.read(source(4)), 0);
        assert_eq!(state.read(source(7)), 1);
        assert_eq!(state.read(source(8)), 0);
        assert_eq!(state.read(source(9)), 0);
        assert_eq!(state.read(source(12)), 1);
        assert_eq!(state.read(source(39)), 0);
    }

    #[test]
    fn reset_clears_clock_and_counters() {
        let mut state = MachineState::new(ShiftRegister::zeroed());
        for _ in 0..7 {
            state.advance(1);
        }
        state.reset(ShiftRegister::zeroed());
        assert_eq!(state, MachineState::new(ShiftRegister::zeroed()));
    }
}
