//! Chart of accounts: a TOML description of the accounts an application
//! defines at startup.
//!
//! ```toml
//! [config]
//! account_identifier_max_length = 31
//! default_currency = "USD"
//!
//! [[accounts]]
//! identifier = "cash"
//!
//! [[accounts]]
//! identifier = "wallet"
//! scope = "user"
//! positive_only = true
//! ```
//!
//! `scope` names a resolver that the caller supplies through
//! [`ScopeResolvers`]; TOML cannot carry code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::account::{AccountDefinition, AccountError, AccountRegistry, ScopeEntity, ScopeIdentifier};
use crate::config::{AccountConfig, ConfigError};
use crate::domain::Currency;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("account '{identifier}' uses unknown scope kind '{scope}'")]
    UnknownScopeKind { identifier: String, scope: String },
    #[error("account error: {0}")]
    Account(#[from] AccountError),
}

/// One `[[accounts]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartAccount {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default)]
    pub positive_only: bool,
    #[serde(default)]
    pub negative_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountChart {
    #[serde(default)]
    pub config: AccountConfig,
    #[serde(default)]
    pub accounts: Vec<ChartAccount>,
}

impl AccountChart {
    pub fn from_toml_str(content: &str) -> Result<Self, ChartError> {
        let chart: Self = toml::from_str(content).map_err(ConfigError::from)?;
        chart.config.validate()?;
        Ok(chart)
    }

    pub fn from_path(path: &Path) -> Result<Self, ChartError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Scope kinds referenced by the chart, deduplicated and sorted.
    pub fn scope_kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.accounts.iter().filter_map(|a| a.scope.as_deref()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        kinds
    }

    /// Define every account, in chart order, into a fresh registry.
    pub fn into_registry(self, resolvers: &ScopeResolvers) -> Result<AccountRegistry, ChartError> {
        let mut registry = AccountRegistry::with_config(self.config)?;
        for entry in self.accounts {
            let mut definition = AccountDefinition::new(entry.identifier);
            if let Some(kind) = entry.scope {
                let resolver = resolvers.get(&kind).ok_or_else(|| ChartError::UnknownScopeKind {
                    identifier: definition.identifier.clone(),
                    scope: kind.clone(),
                })?;
                definition = definition.scoped(resolver.clone());
            }
            definition.positive_only = entry.positive_only;
            definition.negative_only = entry.negative_only;
            definition.currency = entry.currency;
            registry.define(definition)?;
        }
        Ok(registry)
    }
}

/// Named scope resolvers available to a chart.
#[derive(Debug, Clone, Default)]
pub struct ScopeResolvers {
    resolvers: BTreeMap<String, ScopeIdentifier>,
}

impl ScopeResolvers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw text/integer resolvers for each kind.
    pub fn raw_for<'a>(kinds: impl IntoIterator<Item = &'a str>) -> Self {
        let mut resolvers = Self::new();
        for kind in kinds {
            resolvers.insert(kind, ScopeIdentifier::raw(kind));
        }
        resolvers
    }

    pub fn insert(&mut self, kind: impl Into<String>, resolver: ScopeIdentifier) -> &mut Self {
        self.resolvers.insert(kind.into(), resolver);
        self
    }

    /// Register the entity resolver for `T` under `kind`.
    pub fn entity<T: ScopeEntity>(&mut self, kind: impl Into<String>) -> &mut Self {
        self.insert(kind, ScopeIdentifier::entity::<T>())
    }

    pub fn get(&self, kind: &str) -> Option<&ScopeIdentifier> {
        self.resolvers.get(kind)
    }
}
