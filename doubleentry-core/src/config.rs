//! Registry tunables.
//!
//! Set once before any account is defined: the registry takes its config by
//! value at construction and never changes it afterwards.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::domain::Currency;

/// Default maximum length of an account identifier, in characters.
pub const DEFAULT_ACCOUNT_IDENTIFIER_MAX_LENGTH: usize = 31;

/// Default maximum length of a resolved scope identity, in characters.
pub const DEFAULT_SCOPE_IDENTIFIER_MAX_LENGTH: usize = 23;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{field} must be at least 1")]
    ZeroLimit { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    pub account_identifier_max_length: usize,
    pub scope_identifier_max_length: usize,
    /// Currency given to accounts defined without one.
    pub default_currency: Currency,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            account_identifier_max_length: DEFAULT_ACCOUNT_IDENTIFIER_MAX_LENGTH,
            scope_identifier_max_length: DEFAULT_SCOPE_IDENTIFIER_MAX_LENGTH,
            default_currency: Currency::default(),
        }
    }
}

impl AccountConfig {
    pub fn with_account_identifier_max_length(mut self, max: usize) -> Self {
        self.account_identifier_max_length = max;
        self
    }

    pub fn with_scope_identifier_max_length(mut self, max: usize) -> Self {
        self.scope_identifier_max_length = max;
        self
    }

    pub fn with_default_currency(mut self, currency: impl Into<Currency>) -> Self {
        self.default_currency = currency.into();
        self
    }

    /// Parse from TOML. Missing keys fall back to the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.account_identifier_max_length == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "account_identifier_max_length",
            });
        }
        if self.scope_identifier_max_length == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "scope_identifier_max_length",
            });
        }
        Ok(())
    }
}
