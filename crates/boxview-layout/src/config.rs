#![forbid(unsafe_code)]

//! Configuration for the explode tool.
//!
//! [`ExplodeConfig`] can be loaded from TOML or JSON at startup (feature
//! `config`, on by default):
//!
//! ```toml
//! # boxview.toml
//! command_label = "Explode"
//! min_cells_to_enable = 2
//! recency_capacity = 64
//! ```
//!
//! ```rust,ignore
//! let config = ExplodeConfig::from_toml_file("boxview.toml")?;
//! let config = ExplodeConfig::from_json_str(json)?;
//! ```
//!
//! Every field has a default, so a partial file only overrides what it
//! names.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Label of the undo entries the tool records.
pub const DEFAULT_COMMAND_LABEL: &str = "Explode";

/// Tunables for [`ExplodeController`](crate::ExplodeController).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ExplodeConfig {
    /// Undo/redo label for both explode and unexplode.
    pub command_label: String,

    /// The tool is enabled only when the grid has at least this many cells.
    pub min_cells_to_enable: usize,

    /// Maximum remembered cells (0 = unbounded).
    pub recency_capacity: usize,
}

impl Default for ExplodeConfig {
    fn default() -> Self {
        Self {
            command_label: DEFAULT_COMMAND_LABEL.to_string(),
            min_cells_to_enable: 2,
            recency_capacity: 0,
        }
    }
}

impl ExplodeConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load, then reject values that fail [`validate`](Self::validate).
    #[cfg(feature = "config")]
    pub fn from_toml_str_validated(s: &str) -> Result<Self, ConfigError> {
        let config = Self::from_toml_str(s)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Validate all parameters. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.command_label.trim().is_empty() {
            errors.push("command_label must not be empty".to_string());
        }
        if self.min_cells_to_enable == 0 {
            errors.push("min_cells_to_enable must be at least 1".to_string());
        }
        errors
    }
}

/// Errors from loading an [`ExplodeConfig`].
#[cfg(feature = "config")]
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Json(serde_json::Error),
    Invalid(Vec<String>),
}

#[cfg(feature = "config")]
impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Invalid(errors) => write!(f, "invalid config: {}", errors.join("; ")),
        }
    }
}

#[cfg(feature = "config")]
impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}
