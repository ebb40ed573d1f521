//! Error types for the gate tooling.
//!
//! The analysis engine itself never fails; these cover the I/O and
//! configuration edges around it.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config: {0}")]
    ConfigValue(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GateError {
    /// Stable numeric code, used by the CLI as its exit status
    pub fn code(&self) -> i32 {
        match self {
            GateError::Io { .. } => 66,
            GateError::ConfigRead { .. } | GateError::Config { .. } | GateError::ConfigValue(_) => {
                78
            }
            GateError::Json(_) => 65,
        }
    }
}
