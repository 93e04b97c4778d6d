//! Pulse engine for the Muse melody generator.
//!
//! A clock drives a five-bit counter, a two-bit modulo-3 counter and a
//! 31-stage shift register. Eight sliders each pick one bit of that state:
//! the interval sliders (A-D) form the next scale degree, and the parity of
//! the theme sliders (W-Z) is fed back into the shift register. One call to
//! [`Engine::pulse`] produces one note.
//!
//! The tone generator that turns notes into audio frames lives here too.

mod binary_counter;
mod clock;
mod engine;
mod frame;
mod machine;
mod note;
mod parity;
mod shift_register;
mod sliders;
mod tone;
mod triple_counter;

pub use binary_counter::BinaryCounter;
pub use clock::Clock;
pub use engine::{Engine, RegisterReset};
pub use frame::Frame;
pub use machine::MachineState;
pub use note::{encode, shift_semitones, to_frequency, Note};
pub use parity::parity;
pub use shift_register::ShiftRegister;
pub use sliders::{split_snapshot, SliderBank};
pub use tone::{ToneVoice, DEFAULT_GAIN};
pub use triple_counter::TripleCounter;
