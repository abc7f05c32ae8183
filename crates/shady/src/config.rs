use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use renderer::GpuPowerPreference;
use serde::{Deserialize, Serialize};

use crate::cli::{parse_effect, parse_power, parse_size};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// `effect = "clouds"` or `effect = 12`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectSetting {
    Index(usize),
    Slug(String),
}

impl EffectSetting {
    fn resolve(&self) -> Result<usize, String> {
        match self {
            EffectSetting::Index(index) => parse_effect(&index.to_string()),
            EffectSetting::Slug(slug) => parse_effect(slug),
        }
    }
}

/// Contents of `config.toml`. Every key is optional; CLI flags win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShowConfig {
    pub effect: Option<EffectSetting>,
    pub size: Option<String>,
    pub fps: Option<u32>,
    pub vsync: Option<bool>,
    pub power: Option<String>,
}

/// `ShowConfig` with every present value parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedConfig {
    pub effect: Option<usize>,
    pub size: Option<(u32, u32)>,
    pub fps: Option<u32>,
    pub vsync: Option<bool>,
    pub power: Option<GpuPowerPreference>,
}

impl ShowConfig {
    /// Reads `path`, falling back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let effect = self
            .effect
            .as_ref()
            .map(EffectSetting::resolve)
            .transpose()
            .map_err(ConfigError::Invalid)?;
        let size = self
            .size
            .as_deref()
            .map(parse_size)
            .transpose()
            .map_err(|err| ConfigError::Invalid(format!("size: {err}")))?;
        let power = self
            .power
            .as_deref()
            .map(parse_power)
            .transpose()
            .map_err(ConfigError::Invalid)?;

        Ok(ResolvedConfig {
            effect,
            size,
            fps: self.fps,
            vsync: self.vsync,
            power,
        })
    }
}
