//! `AccountHandle`: one account definition, for one scope.
//!
//! Handles are values. They are built on request from a registry lookup,
//! validated once, and compared through a single key:
//! `(identifier, scope identity)`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::balance::{BalanceCalculator, BalanceOptions};
use crate::config::AccountConfig;
use crate::domain::{Currency, Money};

use super::definition::Account;
use super::scope::{mismatch, Scope};
use super::AccountError;

#[derive(Debug, Clone)]
pub struct AccountHandle {
    account: Arc<Account>,
    scope: Option<Scope>,
    scope_identity: Option<String>,
}

impl AccountHandle {
    /// Resolve and validate the scope identity for `account`.
    ///
    /// An unscoped account keeps any supplied scope but ignores it: the
    /// identity stays `None` and no validation happens.
    pub fn new(
        account: Arc<Account>,
        scope: Option<Scope>,
        config: &AccountConfig,
    ) -> Result<Self, AccountError> {
        let scope_identity = match account.scope_identifier() {
            None => None,
            Some(resolver) => {
                let key = match &scope {
                    Some(scope) => resolver.resolve(scope)?,
                    None => return Err(mismatch(resolver.kind(), "None")),
                };
                let identity = key.to_string();
                if identity.chars().count() > config.scope_identifier_max_length {
                    return Err(AccountError::ScopeIdentifierTooLong {
                        identity,
                        max: config.scope_identifier_max_length,
                    });
                }
                Some(identity)
            }
        };

        tracing::trace!(
            identifier = account.identifier(),
            scope_identity = scope_identity.as_deref(),
            "account handle built"
        );

        Ok(Self {
            account,
            scope,
            scope_identity,
        })
    }

    pub fn account(&self) -> &Arc<Account> {
        &self.account
    }

    pub fn identifier(&self) -> &str {
        self.account.identifier()
    }

    /// The scope as supplied by the caller.
    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    /// Canonical string form of the scope; `None` for unscoped accounts.
    pub fn scope_identity(&self) -> Option<&str> {
        self.scope_identity.as_deref()
    }

    pub fn is_scoped(&self) -> bool {
        self.account.is_scoped()
    }

    pub fn positive_only(&self) -> bool {
        self.account.positive_only()
    }

    pub fn negative_only(&self) -> bool {
        self.account.negative_only()
    }

    pub fn currency(&self) -> &Currency {
        self.account.currency()
    }

    /// The string hashed for this handle: `identifier`, or
    /// `scope_identity:identifier` when scoped.
    pub fn hash_key(&self) -> String {
        match &self.scope_identity {
            Some(identity) => format!("{identity}:{}", self.identifier()),
            None => self.identifier().to_string(),
        }
    }

    /// Current or historic balance, computed by `calculator`.
    ///
    /// The options are forwarded verbatim.
    pub fn balance<C: BalanceCalculator>(
        &self,
        calculator: &C,
        options: &BalanceOptions,
    ) -> Result<Money, C::Error> {
        calculator.calculate(self, options)
    }

    /// Ordering key: absent identity sorts as the empty string.
    fn sort_key(&self) -> (&str, &str) {
        (self.scope_identity.as_deref().unwrap_or(""), self.identifier())
    }
}

impl PartialEq for AccountHandle {
    fn eq(&self, other: &Self) -> bool {
        self.identifier() == other.identifier() && self.scope_identity == other.scope_identity
    }
}

impl Eq for AccountHandle {}

impl Ord for AccountHandle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            // Keeps Ord consistent with Eq when a scope resolves to "".
            .then_with(|| self.scope_identity.is_some().cmp(&other.scope_identity.is_some()))
    }
}

impl PartialOrd for AccountHandle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for AccountHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_key().hash(state);
    }
}

impl fmt::Display for AccountHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account account: {} scope: ", self.identifier())?;
        if let Some(scope) = &self.scope {
            write!(f, "{scope}")?;
        }
        write!(f, " currency: {}", self.currency())
    }
}
