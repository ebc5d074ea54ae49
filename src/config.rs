//! Runtime settings, loaded from an optional YAML file.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::ballistics::EARTH_GRAVITY_MPS2;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not open config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("gravity must be a positive finite number, got {0}")]
    InvalidGravity(f64),
    #[error("plot size must be non-zero, got {width}x{height}")]
    InvalidPlotSize { width: u32, height: u32 },
    #[error("plot needs at least 2 samples, got {0}")]
    TooFewSamples(usize),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotSettings {
    pub width: u32,
    pub height: u32,
    pub samples: usize,
    pub output_dir: PathBuf,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 512,
            samples: 200,
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub gravity_mps2: f64,
    /// End the session once a landing position has been printed.
    pub exit_after_landing: bool,
    pub plot: PlotSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity_mps2: EARTH_GRAVITY_MPS2,
            exit_after_landing: true,
            plot: PlotSettings::default(),
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_yaml::from_reader(file)?;
        settings.validate()?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_yaml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity_mps2.is_finite() || self.gravity_mps2 <= 0.0 {
            return Err(ConfigError::InvalidGravity(self.gravity_mps2));
        }
        if self.plot.width == 0 || self.plot.height == 0 {
            return Err(ConfigError::InvalidPlotSize {
                width: self.plot.width,
                height: self.plot.height,
            });
        }
        if self.plot.samples < 2 {
            return Err(ConfigError::TooFewSamples(self.plot.samples));
        }
        Ok(())
    }
}
