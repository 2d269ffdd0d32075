//! Accounts: definitions, the registry that holds them, scope resolution,
//! and the comparable handles built from them.

pub mod definition;
pub mod handle;
pub mod registry;
pub mod scope;

pub use definition::{Account, AccountDefinition};
pub use handle::AccountHandle;
pub use registry::AccountRegistry;
pub use scope::{Scope, ScopeEntity, ScopeIdentifier};

use thiserror::Error;

/// Validation failures raised while defining or resolving accounts.
///
/// None of these are retried. A failed call leaves the registry and any
/// handles built earlier untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("account already defined: {identifier}")]
    DuplicateAccount { identifier: String },

    #[error("account identifier '{identifier}' is longer than {max} characters")]
    AccountIdentifierTooLong { identifier: String, max: usize },

    #[error("account identifier must not be blank")]
    BlankAccountIdentifier,

    #[error("unknown account: {identifier} scoped?: {scoped}{}", defined_hint(.defined_scoped))]
    UnknownAccount {
        identifier: String,
        scoped: bool,
        /// Scoped-ness of a definition with the same identifier, if one exists.
        defined_scoped: Option<bool>,
    },

    #[error("expected instance of `{expected}`, received instance of `{received}`")]
    AccountScopeMismatch { expected: String, received: String },

    #[error("scope identifier '{identity}' is longer than {max} characters")]
    ScopeIdentifierTooLong { identity: String, max: usize },
}

fn defined_hint(defined_scoped: &Option<bool>) -> &'static str {
    match defined_scoped {
        Some(true) => " (defined as scoped)",
        Some(false) => " (defined as unscoped)",
        None => "",
    }
}
