//! Slider names and the bit sources a slider can be bound to.
//!
//! A selector value addresses one bit of machine state through a fixed
//! layout: `[off, on, binary 0-4, triple 0-1, register 0-30]`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Bits in the binary counter.
pub const BINARY_BITS: usize = 5;
/// Bits in the modulo-3 counter.
pub const TRIPLE_BITS: usize = 2;
/// Stages in the shift register.
pub const REGISTER_BITS: usize = 31;
/// Number of sliders on the instrument.
pub const SLIDER_COUNT: usize = 8;

const FIRST_BINARY: u8 = 2;
const FIRST_TRIPLE: u8 = FIRST_BINARY + BINARY_BITS as u8;
const FIRST_REGISTER: u8 = FIRST_TRIPLE + TRIPLE_BITS as u8;

/// Highest valid selector value (last shift register stage).
pub const MAX_SELECTOR: u8 = FIRST_REGISTER + REGISTER_BITS as u8 - 1;

/// The eight sliders, in snapshot order.
///
/// A-D are the interval sliders (they pick the note), W-Z are the theme
/// sliders (they feed the shift register through the parity bit).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SliderName {
    A,
    B,
    C,
    D,
    W,
    X,
    Y,
    Z,
}

impl SliderName {
    pub const ALL: [SliderName; SLIDER_COUNT] = [
        SliderName::A,
        SliderName::B,
        SliderName::C,
        SliderName::D,
        SliderName::W,
        SliderName::X,
        SliderName::Y,
        SliderName::Z,
    ];

    pub const INTERVAL: [SliderName; 4] =
        [SliderName::A, SliderName::B, SliderName::C, SliderName::D];

    pub const THEME: [SliderName; 4] = [SliderName::W, SliderName::X, SliderName::Y, SliderName::Z];

    /// Position of this slider in an 8-element snapshot.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_interval(self) -> bool {
        self.index() < 4
    }

    pub const fn letter(self) -> char {
        match self {
            SliderName::A => 'A',
            SliderName::B => 'B',
            SliderName::C => 'C',
            SliderName::D => 'D',
            SliderName::W => 'W',
            SliderName::X => 'X',
            SliderName::Y => 'Y',
            SliderName::Z => 'Z',
        }
    }
}

impl std::fmt::Display for SliderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for SliderName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_ascii_uppercase(),
            _ => return Err(ConfigError::UnknownSlider(trimmed.to_string())),
        };
        SliderName::ALL
            .into_iter()
            .find(|name| name.letter() == letter)
            .ok_or_else(|| ConfigError::UnknownSlider(trimmed.to_string()))
    }
}

/// Where a slider reads its bit from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SliderSource {
    /// Constant 0
    #[default]
    Off,
    /// Constant 1
    On,
    /// Binary counter bit 0-4
    Binary(u8),
    /// Modulo-3 counter bit 0-1
    Triple(u8),
    /// Shift register stage 0-30 (0 is the newest bit)
    Shift(u8),
}

impl SliderSource {
    /// Decode a selector value.
    ///
    /// The slider name is only used to label the error.
    pub fn from_selector(slider: SliderName, selector: u8) -> Result<Self, ConfigError> {
        let source = match selector {
            0 => SliderSource::Off,
            1 => SliderSource::On,
            s if s < FIRST_TRIPLE => SliderSource::Binary(s - FIRST_BINARY),
            s if s < FIRST_REGISTER => SliderSource::Triple(s - FIRST_TRIPLE),
            s if s <= MAX_SELECTOR => SliderSource::Shift(s - FIRST_REGISTER),
            _ => return Err(ConfigError::SelectorOutOfRange { slider, selector }),
        };
        Ok(source)
    }

    /// Encode back to a selector value.
    pub const fn selector(self) -> u8 {
        match self {
            SliderSource::Off => 0,
            SliderSource::On => 1,
            SliderSource::Binary(p) => FIRST_BINARY + p,
            SliderSource::Triple(p) => FIRST_TRIPLE + p,
            SliderSource::Shift(p) => FIRST_REGISTER + p,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_layout_boundaries() {
        let s = |v| SliderSource::from_selector(SliderName::A, v).unwrap();
        assert_eq!(s(0), SliderSource::Off);
        assert_eq!(s(1), SliderSource::On);
        assert_eq!(s(2), SliderSource::Binary(0));
        assert_eq!(s(6), SliderSource::Binary(4));
        assert_eq!(s(7), SliderSource::Triple(0));
        assert_eq!(s(8), SliderSource::Triple(1));
        assert_eq!(s(9), SliderSource::Shift(0));
        assert_eq!(s(39), SliderSource::Shift(30));
    }

    #[test]
    fn selector_above_range_is_rejected() {
        let err = SliderSource::from_selector(SliderName::Z, 40).unwrap_err();
        assert_eq!(
            err,
            ConfigError::SelectorOutOfRange {
                slider: SliderName::Z,
                selector: 40
            }
        );
    }

    #[test]
    fn selector_roundtrips_for_every_valid_value() {
        for v in 0..=MAX_SELECTOR {
            let source = SliderSource::from_selector(SliderName::B, v).unwrap();
            assert_eq!(source.selector(), v);
        }
    }

    #[test]
    fn max_selector_is_last_register_stage() {
        assert_eq!(MAX_SELECTOR, 39);
    }

    #[test]
    fn slider_names_parse_case_insensitively() {
        assert_eq!("a".parse::<SliderName>().unwrap(), SliderName::A);
        assert_eq!(" Z ".parse::<SliderName>().unwrap(), SliderName::Z);
        assert_eq!(
            "Q".parse::<SliderName>().unwrap_err(),
            ConfigError::UnknownSlider("Q".to_string())
        );
    }

    #[test]
    fn interval_and_theme_split() {
        assert!(SliderName::INTERVAL.iter().all(|s| s.is_interval()));
        assert!(SliderName::THEME.iter().all(|s| !s.is_interval()));
        assert_eq!(SliderName::W.index(), 4);
    }
}
