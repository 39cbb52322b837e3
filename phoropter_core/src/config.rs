//! Configuration file support.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/phoropter/config.toml`.
//! Every key is optional; missing keys fall back to the defaults below.

use crate::{AxisStep, Error, PdLayout, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Instrument variant configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Degrees per axis click; only 1 and 5 deserialize
    #[serde(default)]
    pub axis_step: AxisStep,

    #[serde(default)]
    pub pd_layout: PdLayout,

    /// Chart shown when a session starts or is reset
    #[serde(default = "default_initial_chart")]
    pub initial_chart: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            axis_step: AxisStep::default(),
            pd_layout: PdLayout::default(),
            initial_chart: default_initial_chart(),
        }
    }
}

/// CSV field delimiter
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            Delimiter::Comma => "csv",
            Delimiter::Tab => "tsv",
        }
    }
}

/// Log export configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    #[serde(default)]
    pub delimiter: Delimiter,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::default(),
            output_dir: default_output_dir(),
        }
    }
}

// Default value functions
fn default_initial_chart() -> String {
    "E-1.0".into()
}

fn default_output_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("phoropter")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("phoropter")
            .join("config.toml")
    }

    /// Check values that serde cannot restrict on its own
    pub fn validate(&self) -> Result<()> {
        if self.model.initial_chart.trim().is_empty() {
            return Err(Error::Config("initial_chart must not be empty".into()));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
