//! Codec configuration
//!
//! Handles loading codec settings from TOML, either a dedicated file or a
//! fragment of a host application's configuration:
//!
//! ```toml
//! field-keys = "strict"
//! pretty = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the non-discriminator keys of an object are matched to fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKeys {
    /// Values are taken in the order they appear, whatever their keys
    #[default]
    Positional,
    /// Keys must be exactly `Item0..ItemN-1`, in ascending order
    Strict,
}

/// Codec settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CodecConfig {
    /// Field key policy applied while decoding
    pub field_keys: FieldKeys,
    /// Pretty-print text and byte output
    pub pretty: bool,
}

impl CodecConfig {
    /// Parse settings from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    #[must_use]
    pub fn with_field_keys(mut self, field_keys: FieldKeys) -> Self {
        self.field_keys = field_keys;
        self
    }

    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Errors raised while loading a [`CodecConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
