//! Configuration for the gate tools.
//!
//! Loads settings from a TOML file or uses defaults. Every field has a
//! serde default, so a partial file only overrides what it names.
//!
//! Lookup order: explicit path, `$GATE_CONFIG`, `/etc/gate/config.toml`,
//! built-in defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::GateError;

/// System-wide config file path
pub const SYSTEM_CONFIG_PATH: &str = "/etc/gate/config.toml";

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "GATE_CONFIG";

/// Upper bound for `snapshot_max_age_secs` (one year)
pub const MAX_SNAPSHOT_AGE_SECS: i64 = 365 * 24 * 3600;

/// Analysis thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// A close slower than nominal x this factor is "slow"
    #[serde(default = "default_slow_factor")]
    pub slow_factor: f64,

    /// Humidity (%RH) at or above which a reading counts as wet
    #[serde(default = "default_wet_humidity")]
    pub wet_humidity: f64,

    /// Max distance between a move and the snapshot it is correlated with
    #[serde(default = "default_snapshot_max_age")]
    pub snapshot_max_age_secs: i64,
}

fn default_slow_factor() -> f64 {
    1.3
}

fn default_wet_humidity() -> f64 {
    75.0
}

fn default_snapshot_max_age() -> i64 {
    crate::snapshot::DEFAULT_MAX_AGE_SECS
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            slow_factor: default_slow_factor(),
            wet_humidity: default_wet_humidity(),
            snapshot_max_age_secs: default_snapshot_max_age(),
        }
    }
}

impl AnalysisConfig {
    /// Correlation window; values past chrono's range saturate
    pub fn snapshot_max_age(&self) -> chrono::Duration {
        chrono::Duration::try_seconds(self.snapshot_max_age_secs).unwrap_or(chrono::Duration::MAX)
    }

    fn validate(&self) -> Result<(), GateError> {
        if !(self.slow_factor.is_finite() && self.slow_factor > 0.0) {
            return Err(GateError::ConfigValue(format!(
                "analysis.slow_factor must be positive, got {}",
                self.slow_factor
            )));
        }
        if !self.wet_humidity.is_finite() {
            return Err(GateError::ConfigValue(
                "analysis.wet_humidity must be finite".to_string(),
            ));
        }
        if self.snapshot_max_age_secs < 0 {
            return Err(GateError::ConfigValue(format!(
                "analysis.snapshot_max_age_secs must not be negative, got {}",
                self.snapshot_max_age_secs
            )));
        }
        if self.snapshot_max_age_secs > MAX_SNAPSHOT_AGE_SECS {
            return Err(GateError::ConfigValue(format!(
                "analysis.snapshot_max_age_secs must be at most {}, got {}",
                MAX_SNAPSHOT_AGE_SECS, self.snapshot_max_age_secs
            )));
        }
        Ok(())
    }
}

/// Upload service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Request body cap; logs are tiny, this blocks abuse
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Accepted upload filename extensions (lowercase, with dot)
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

fn default_bind() -> String {
    "127.0.0.1:7866".to_string()
}

fn default_max_upload_bytes() -> usize {
    512 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    vec![".txt".to_string(), ".log".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_bytes: default_max_upload_bytes(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl GateConfig {
    /// Parse TOML text
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, GateError> {
        let config: GateConfig = toml::from_str(text).map_err(|source| GateError::Config {
            path: origin.to_path_buf(),
            source,
        })?;
        config.analysis.validate()?;
        Ok(config)
    }

    /// Load a specific file; a missing file is an error
    pub fn load_from(path: &Path) -> Result<Self, GateError> {
        let text = fs::read_to_string(path).map_err(|source| GateError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        info!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Resolve and load config following the lookup order
    pub fn load(explicit: Option<&Path>) -> Result<Self, GateError> {
        match Self::resolve_path(explicit) {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Which file would be loaded, if any
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        let system = PathBuf::from(SYSTEM_CONFIG_PATH);
        system.exists().then_some(system)
    }
}
