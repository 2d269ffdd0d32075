//! The set of accounts an application declares at startup.
//!
//! Populate it once during configuration, then share it read-only (by
//! reference or `Arc`). `define` takes `&mut self`, so a definition can
//! never race a lookup on the same registry.

use std::sync::Arc;

use crate::config::{AccountConfig, ConfigError};
use crate::domain::Currency;

use super::definition::{Account, AccountDefinition};
use super::handle::AccountHandle;
use super::scope::{Scope, ScopeEntity, ScopeIdentifier};
use super::AccountError;

#[derive(Debug, Clone, Default)]
pub struct AccountRegistry {
    config: AccountConfig,
    accounts: Vec<Arc<Account>>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry with `config`. Zero limits are rejected.
    pub fn with_config(config: AccountConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            accounts: Vec::new(),
        })
    }

    pub fn config(&self) -> &AccountConfig {
        &self.config
    }

    /// Validate and append an account.
    ///
    /// Identifiers are unique regardless of scoped-ness. On error the
    /// registry is unchanged.
    pub fn define(&mut self, definition: AccountDefinition) -> Result<Arc<Account>, AccountError> {
        let account = Account::new(definition, &self.config)?;
        if self.get(account.identifier()).is_some() {
            return Err(AccountError::DuplicateAccount {
                identifier: account.identifier().to_string(),
            });
        }

        tracing::debug!(
            identifier = account.identifier(),
            scoped = account.is_scoped(),
            currency = %account.currency(),
            "account defined"
        );

        let account = Arc::new(account);
        self.accounts.push(Arc::clone(&account));
        Ok(account)
    }

    /// First account matching both `identifier` and `scoped`.
    pub fn find(&self, identifier: &str, scoped: bool) -> Result<Arc<Account>, AccountError> {
        if let Some(account) = self
            .accounts
            .iter()
            .find(|a| a.identifier() == identifier && a.is_scoped() == scoped)
        {
            return Ok(Arc::clone(account));
        }

        let defined_scoped = self.get(identifier).map(|a| a.is_scoped());
        tracing::debug!(identifier, scoped, ?defined_scoped, "account lookup missed");
        Err(AccountError::UnknownAccount {
            identifier: identifier.to_string(),
            scoped,
            defined_scoped,
        })
    }

    /// Lookup by identifier alone, ignoring scoped-ness.
    pub fn get(&self, identifier: &str) -> Option<&Arc<Account>> {
        self.accounts.iter().find(|a| a.identifier() == identifier)
    }

    /// Currency of the named account, or `None` if it is not defined.
    pub fn currency(&self, identifier: &str) -> Option<&Currency> {
        self.get(identifier).map(|a| a.currency())
    }

    /// Handle for `identifier`, scoped by `scope` when one is present.
    ///
    /// A present scope (see [`Scope::is_present`]) selects the scoped
    /// definition, so asking for a scoped account without one (or the
    /// reverse) is an `UnknownAccount`. A blank scope on an unscoped account
    /// is carried on the handle and ignored.
    pub fn account(&self, identifier: &str, scope: Option<Scope>) -> Result<AccountHandle, AccountError> {
        let scoped = scope.as_ref().is_some_and(Scope::is_present);
        let account = self.find(identifier, scoped)?;
        AccountHandle::new(account, scope, &self.config)
    }

    /// Resolver for accounts scoped by entity type `T`.
    pub fn entity_scope_identifier<T: ScopeEntity>(&self) -> ScopeIdentifier {
        ScopeIdentifier::entity::<T>()
    }

    /// Accounts in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Account>> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl<'a> IntoIterator for &'a AccountRegistry {
    type Item = &'a Arc<Account>;
    type IntoIter = std::slice::Iter<'a, Arc<Account>>;

    fn into_iter(self) -> Self::IntoIter {
        self.accounts.iter()
    }
}
