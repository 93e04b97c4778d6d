//! Patch loading: TOML file first, command-line overrides on top.

use muse_ir::{ConfigError, Patch, SliderName, Temperament};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Why a patch could not be assembled.
#[derive(Debug)]
pub enum LoadError {
    /// Config file could not be read
    Io(PathBuf, std::io::Error),
    /// Config file is not a valid patch document
    Parse(PathBuf, toml::de::Error),
    /// Values are out of range
    Invalid(ConfigError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(path, e) => write!(f, "cannot read {}: {}", path.display(), e),
            LoadError::Parse(path, e) => write!(f, "invalid patch file {}: {}", path.display(), e),
            LoadError::Invalid(e) => write!(f, "invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(_, e) => Some(e),
            LoadError::Parse(_, e) => Some(e),
            LoadError::Invalid(e) => Some(e),
        }
    }
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        LoadError::Invalid(e)
    }
}

/// Values given on the command line; each one replaces the file's value.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub tonic_hz: Option<f64>,
    pub bpm: Option<u32>,
    pub sliders: Vec<(SliderName, u8)>,
    pub seed: Option<u64>,
    pub temperament: Option<Temperament>,
}

/// Read a patch from a TOML file.
pub fn read_patch(path: &Path) -> Result<Patch, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| LoadError::Io(path.to_path_buf(), e))?;
    toml::from_str(&text).map_err(|e| LoadError::Parse(path.to_path_buf(), e))
}

/// Build the session patch: file (or the preset), then overrides, then validation.
pub fn load_patch(path: Option<&Path>, overrides: &Overrides) -> Result<Patch, LoadError> {
    let mut patch = match path {
        Some(path) => read_patch(path)?,
        None => Patch::default(),
    };
    apply_overrides(&mut patch, overrides)?;
    patch.validate()?;
    Ok(patch)
}

fn apply_overrides(patch: &mut Patch, overrides: &Overrides) -> Result<(), ConfigError> {
    if let Some(hz) = overrides.tonic_hz {
        patch.tonic_hz = hz;
    }
    if let Some(bpm) = overrides.bpm {
        patch.bpm = bpm;
    }
    if let Some(seed) = overrides.seed {
        patch.seed = Some(seed);
    }
    if let Some(temperament) = overrides.temperament {
        patch.temperament = temperament;
    }
    for &(slider, selector) in &overrides.sliders {
        patch.set_selector(slider, selector)?;
    }
    Ok(())
}

/// Parse a `NAME=SELECTOR` slider assignment such as `W=12`.
pub fn parse_slider_assignment(arg: &str) -> Result<(SliderName, u8), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=SELECTOR, got '{}'", arg))?;
    let slider = name.parse::<SliderName>().map_err(|e| e.to_string())?;
    let selector = value
        .trim()
        .parse::<u8>()
        .map_err(|e| format!("bad selector '{}': {}", value, e))?;
    Ok((slider, selector))
}
