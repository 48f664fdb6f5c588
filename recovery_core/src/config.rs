//! Configuration file support for quitmeter.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/quitmeter/config.toml`.

use crate::model::DEFAULT_STEEPNESS;
use crate::{Error, ProductCategory, Result, UsageProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub profile: Option<ProfileConfig>,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Stored usage profile and quit date
///
/// Every field is optional so a partially filled file still parses; missing
/// fields are reported when the profile is resolved.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileConfig {
    pub category: Option<ProductCategory>,
    pub units: Option<f64>,
    pub daily_cost: Option<f64>,
    pub harm_level: Option<f64>,
    pub quit_date: Option<DateTime<Utc>>,
}

impl ProfileConfig {
    /// Overlay fields from `other` that are set
    pub fn merge(&mut self, other: ProfileConfig) {
        if other.category.is_some() {
            self.category = other.category;
        }
        if other.units.is_some() {
            self.units = other.units;
        }
        if other.daily_cost.is_some() {
            self.daily_cost = other.daily_cost;
        }
        if other.harm_level.is_some() {
            self.harm_level = other.harm_level;
        }
        if other.quit_date.is_some() {
            self.quit_date = other.quit_date;
        }
    }

    /// Build a validated usage profile, failing on the first missing field
    pub fn to_profile(&self) -> Result<UsageProfile> {
        let profile = UsageProfile::new(
            self.category.ok_or_else(|| missing("category"))?,
            self.units.ok_or_else(|| missing("units"))?,
            self.daily_cost.ok_or_else(|| missing("daily_cost"))?,
            self.harm_level.ok_or_else(|| missing("harm_level"))?,
        );
        profile.validate()?;
        Ok(profile)
    }

    pub fn quit_date(&self) -> Result<DateTime<Utc>> {
        self.quit_date.ok_or_else(|| missing("quit_date"))
    }
}

fn missing(field: &str) -> Error {
    Error::InvalidProfile(format!("missing required field '{}'", field))
}

/// Recovery model parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_steepness")]
    pub steepness: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            steepness: default_steepness(),
        }
    }
}

/// Output formatting configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
        }
    }
}

// Default value functions
fn default_steepness() -> f64 {
    DEFAULT_STEEPNESS
}

fn default_currency_symbol() -> String {
    "$".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| Error::Config("Unable to determine config directory".into()))?;
        Ok(base.join("quitmeter").join("config.toml"))
    }

    /// Check model parameters
    pub fn validate(&self) -> Result<()> {
        if !(self.model.steepness.is_finite() && self.model.steepness > 0.0) {
            return Err(Error::Config(format!(
                "model.steepness must be positive, got {}",
                self.model.steepness
            )));
        }
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    ///
    /// Writes to a temp file in the same directory and renames it over the
    /// original so readers never see a half-written file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Config(format!("Config path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(contents.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
