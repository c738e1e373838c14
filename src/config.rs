//! Trainer configuration.
//!
//! Loaded from JSON (inline or from a file); every field has a default, so
//! `{}` is a valid configuration.
//!
//! ```json
//! {
//!   "auto_advance_delay_ms": 3000,
//!   "border_check_questions": 20,
//!   "border_check_distance": 2,
//!   "storage_dir": "/home/me/.range-trainer"
//! }
//! ```
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse trainer config from {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

fn default_auto_advance_delay_ms() -> u64 {
    3000
}

fn default_border_check_questions() -> usize {
    20
}

fn default_border_check_distance() -> usize {
    2
}

/// Configuration for a trainer workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Delay before a correct classic answer moves on to the next hand.
    #[serde(default = "default_auto_advance_delay_ms")]
    pub auto_advance_delay_ms: u64,
    /// Maximum number of questions in a border-check classic session.
    #[serde(default = "default_border_check_questions")]
    pub border_check_questions: usize,
    /// How many cells away from an action boundary a hand may be and still
    /// count as a border hand.
    #[serde(default = "default_border_check_distance")]
    pub border_check_distance: usize,
    /// Directory holding the JSON documents. `None` keeps everything in
    /// memory.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            auto_advance_delay_ms: default_auto_advance_delay_ms(),
            border_check_questions: default_border_check_questions(),
            border_check_distance: default_border_check_distance(),
            storage_dir: None,
        }
    }
}

impl TrainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate an inline JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TrainerConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse {
                path: "<inline>".to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: TrainerConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.border_check_questions == 0 {
            return Err(ConfigError::ValidationError(
                "border_check_questions must be greater than 0".to_string(),
            ));
        }

        if self.border_check_questions > crate::core::HAND_COUNT {
            return Err(ConfigError::ValidationError(format!(
                "border_check_questions ({}) cannot exceed {} hands",
                self.border_check_questions,
                crate::core::HAND_COUNT
            )));
        }

        if self.border_check_distance == 0 {
            return Err(ConfigError::ValidationError(
                "border_check_distance must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
