use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency code (ISO 4217 style, e.g. "USD").
///
/// Opaque to the registry: carried on each account and handed to balance
/// calculators, never converted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(pub String);

impl Currency {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Raw value a scope resolver hands back, before stringification.
///
/// Entities project their primary id into one of these; plain text and
/// integer scopes pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeKey {
    Integer(i64),
    Text(String),
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKey::Integer(id) => write!(f, "{id}"),
            ScopeKey::Text(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for ScopeKey {
    fn from(id: i64) -> Self {
        Self::Integer(id)
    }
}

impl From<&str> for ScopeKey {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for ScopeKey {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}
