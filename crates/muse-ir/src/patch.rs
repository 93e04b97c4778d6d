//! Patch: the complete configuration a Muse session starts from.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;
use crate::scale::Temperament;
use crate::slider::{SliderName, SliderSource, SLIDER_COUNT};

/// Slider positions of the reference preset, in A-D, W-Z order.
const DEFAULT_SLIDERS: [u8; SLIDER_COUNT] = [17, 17, 18, 19, 4, 19, 8, 25];

/// Instrument settings supplied by the user.
///
/// Deserializes from TOML; every field is optional and falls back to the
/// reference preset:
///
/// ```toml
/// tonic_hz = 261.6
/// bpm = 120
/// seed = 7
/// temperament = "legacy"
///
/// [sliders]
/// A = 2
/// W = 9
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Patch {
    /// Frequency of scale degree 0, in Hz
    pub tonic_hz: f64,
    /// Tempo in beats per minute (one pulse per beat)
    pub bpm: u32,
    /// Selector of each slider, indexed by `SliderName::index()`
    #[serde(serialize_with = "ser_sliders", deserialize_with = "de_sliders")]
    pub sliders: [u8; SLIDER_COUNT],
    /// Shift register seed; `None` draws one at startup
    pub seed: Option<u64>,
    pub temperament: Temperament,
}

impl Default for Patch {
    fn default() -> Self {
        Self {
            tonic_hz: 200.0,
            bpm: 240,
            sliders: DEFAULT_SLIDERS,
            seed: None,
            temperament: Temperament::Equal,
        }
    }
}

impl Patch {
    /// A patch with every slider switched off.
    pub fn silent(tonic_hz: f64, bpm: u32) -> Self {
        Self {
            tonic_hz,
            bpm,
            sliders: [0; SLIDER_COUNT],
            ..Self::default()
        }
    }

    /// Builder-style slider assignment (unchecked; call `validate`).
    pub fn with_slider(mut self, slider: SliderName, selector: u8) -> Self {
        self.sliders[slider.index()] = selector;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn selector(&self, slider: SliderName) -> u8 {
        self.sliders[slider.index()]
    }

    /// Rebind one slider, rejecting out-of-range selectors.
    pub fn set_selector(&mut self, slider: SliderName, selector: u8) -> Result<(), ConfigError> {
        SliderSource::from_selector(slider, selector)?;
        self.sliders[slider.index()] = selector;
        Ok(())
    }

    /// Decode all eight selectors.
    pub fn sources(&self) -> Result<[SliderSource; SLIDER_COUNT], ConfigError> {
        let mut sources = [SliderSource::Off; SLIDER_COUNT];
        for name in SliderName::ALL {
            sources[name.index()] = SliderSource::from_selector(name, self.selector(name))?;
        }
        Ok(sources)
    }

    /// Check the whole patch. An invalid patch must not start an engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tonic_hz.is_finite() && self.tonic_hz > 0.0) {
            return Err(ConfigError::NonPositiveTonic(self.tonic_hz));
        }
        if self.bpm == 0 {
            return Err(ConfigError::NonPositiveBpm);
        }
        self.sources().map(|_| ())
    }

    /// Length of one beat (one pulse) in seconds.
    pub fn beat_seconds(&self) -> f64 {
        60.0 / self.bpm.max(1) as f64
    }
}

/// TOML shape of the slider block: one optional key per slider letter.
#[derive(Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SliderTable {
    #[serde(rename = "A", skip_serializing_if = "Option::is_none")]
    a: Option<u8>,
    #[serde(rename = "B", skip_serializing_if = "Option::is_none")]
    b: Option<u8>,
    #[serde(rename = "C", skip_serializing_if = "Option::is_none")]
    c: Option<u8>,
    #[serde(rename = "D", skip_serializing_if = "Option::is_none")]
    d: Option<u8>,
    #[serde(rename = "W", skip_serializing_if = "Option::is_none")]
    w: Option<u8>,
    #[serde(rename = "X", skip_serializing_if = "Option::is_none")]
    x: Option<u8>,
    #[serde(rename = "Y", skip_serializing_if = "Option::is_none")]
    y: Option<u8>,
    #[serde(rename = "Z", skip_serializing_if = "Option::is_none")]
    z: Option<u8>,
}

impl SliderTable {
    fn entries(&self) -> [Option<u8>; SLIDER_COUNT] {
        [self.a, self.b, self.c, self.d, self.w, self.x, self.y, self.z]
    }
}

fn ser_sliders<S: Serializer>(sliders: &[u8; SLIDER_COUNT], s: S) -> Result<S::Ok, S::Error> {
    let [a, b, c, d, w, x, y, z] = sliders.map(Some);
    SliderTable { a, b, c, d, w, x, y, z }.serialize(s)
}

fn de_sliders<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; SLIDER_COUNT], D::Error> {
    let table = SliderTable::deserialize(d)?;
    let mut sliders = DEFAULT_SLIDERS;
    for (slot, value) in sliders.iter_mut().zip(table.entries()) {
        if let Some(v) = value {
            *slot = v;
        }
    }
    Ok(sliders)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_patch_is_valid() {
        let patch = Patch::default();
        assert!(patch.validate().is_ok());
        assert_eq!(patch.selector(SliderName::A), 17);
        assert_eq!(patch.selector(SliderName::Z), 25);
    }

    #[test]
    fn zero_bpm_is_rejected() {
        let patch = Patch {
            bpm: 0,
            ..Patch::default()
        };
        assert_eq!(patch.validate(), Err(ConfigError::NonPositiveBpm));
    }

    #[test]
    fn non_positive_tonic_is_rejected() {
        for hz in [0.0, -440.0, f64::NAN, f64::INFINITY] {
            let patch = Patch {
                tonic_hz: hz,
                ..Patch::default()
            };
            assert!(matches!(patch.validate(), Err(ConfigError::NonPositiveTonic(_))));
        }
    }

    #[test]
    fn out_of_range_selector_is_rejected() {
        let patch = Patch::default().with_slider(SliderName::Y, 40);
        assert_eq!(
            patch.validate(),
            Err(ConfigError::SelectorOutOfRange {
                slider: SliderName::Y,
                selector: 40
            })
        );
    }

    #[test]
    fn set_selector_leaves_patch_untouched_on_error() {
        let mut patch = Patch::default();
        assert!(patch.set_selector(SliderName::B, 200).is_err());
        assert_eq!(patch.selector(SliderName::B), 17);
        patch.set_selector(SliderName::B, 39).unwrap();
        assert_eq!(patch.selector(SliderName::B), 39);
    }

    #[test]
    fn beat_length_follows_tempo() {
        let patch = Patch::silent(261.6, 120);
        assert!((patch.beat_seconds() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn toml_fills_missing_fields_from_preset() {
        let patch: Patch = toml::from_str(
            r#"
            tonic_hz = 261.6
            temperament = "legacy"

            [sliders]
            A = 2
            W = 9
            "#,
        )
        .unwrap();
        assert_eq!(patch.tonic_hz, 261.6);
        assert_eq!(patch.bpm, 240);
        assert_eq!(patch.temperament, Temperament::Legacy);
        assert_eq!(patch.selector(SliderName::A), 2);
        assert_eq!(patch.selector(SliderName::B), 17);
        assert_eq!(patch.selector(SliderName::W), 9);
        assert_eq!(patch.seed, None);
    }

    #[test]
    fn toml_rejects_unknown_slider_keys() {
        let result: Result<Patch, _> = toml::from_str("[sliders]\nQ = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn toml_roundtrip_preserves_patch() {
        let patch = Patch::silent(300.0, 90)
            .with_slider(SliderName::C, 12)
            .with_seed(99);
        let text = toml::to_string(&patch).unwrap();
        let back: Patch = toml::from_str(&text).unwrap();
        assert_eq!(back, patch);
    }
}
