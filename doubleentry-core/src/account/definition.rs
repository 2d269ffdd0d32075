use std::fmt;

use crate::config::AccountConfig;
use crate::domain::Currency;

use super::scope::ScopeIdentifier;
use super::AccountError;

/// Attributes for a new account, consumed by [`AccountRegistry::define`].
///
/// [`AccountRegistry::define`]: super::AccountRegistry::define
#[derive(Debug, Clone)]
pub struct AccountDefinition {
    pub identifier: String,
    pub scope_identifier: Option<ScopeIdentifier>,
    pub positive_only: bool,
    pub negative_only: bool,
    /// Falls back to the registry's default currency when absent.
    pub currency: Option<Currency>,
}

impl AccountDefinition {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            scope_identifier: None,
            positive_only: false,
            negative_only: false,
            currency: None,
        }
    }

    pub fn scoped(mut self, scope_identifier: ScopeIdentifier) -> Self {
        self.scope_identifier = Some(scope_identifier);
        self
    }

    pub fn positive_only(mut self) -> Self {
        self.positive_only = true;
        self
    }

    pub fn negative_only(mut self) -> Self {
        self.negative_only = true;
        self
    }

    pub fn currency(mut self, currency: impl Into<Currency>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

/// A validated account definition. Immutable once built.
///
/// The sign constraints are carried for transfer and balance collaborators;
/// nothing in this crate enforces them.
#[derive(Debug, Clone)]
pub struct Account {
    identifier: String,
    scope_identifier: Option<ScopeIdentifier>,
    positive_only: bool,
    negative_only: bool,
    currency: Currency,
}

impl Account {
    /// Validate `definition` against `config`.
    ///
    /// Identifier length is measured in characters, not bytes.
    pub fn new(definition: AccountDefinition, config: &AccountConfig) -> Result<Self, AccountError> {
        let AccountDefinition {
            identifier,
            scope_identifier,
            positive_only,
            negative_only,
            currency,
        } = definition;

        if identifier.trim().is_empty() {
            return Err(AccountError::BlankAccountIdentifier);
        }
        if identifier.chars().count() > config.account_identifier_max_length {
            return Err(AccountError::AccountIdentifierTooLong {
                identifier,
                max: config.account_identifier_max_length,
            });
        }

        Ok(Self {
            identifier,
            scope_identifier,
            positive_only,
            negative_only,
            currency: currency.unwrap_or_else(|| config.default_currency.clone()),
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn scope_identifier(&self) -> Option<&ScopeIdentifier> {
        self.scope_identifier.as_ref()
    }

    pub fn is_scoped(&self) -> bool {
        self.scope_identifier.is_some()
    }

    pub fn positive_only(&self) -> bool {
        self.positive_only
    }

    pub fn negative_only(&self) -> bool {
        self.negative_only
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)?;
        if let Some(scope_identifier) = &self.scope_identifier {
            write!(f, " [{}]", scope_identifier.kind())?;
        }
        if self.positive_only {
            write!(f, " +")?;
        }
        if self.negative_only {
            write!(f, " -")?;
        }
        write!(f, " {}", self.currency)
    }
}
