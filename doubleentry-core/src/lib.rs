//! Double-entry core: account identity and registry.
//!
//! This crate holds the account layer every other bookkeeping subsystem
//! keys off:
//! - Validated, immutable account definitions with sign and currency rules
//! - An append-only registry enforcing identifier uniqueness
//! - Scope resolution from host entities (or raw ids) to scope identities
//! - Account handles with equality, ordering and hashing over one key
//! - The boundary to an external balance calculator
//! - TOML charts of accounts for declarative startup

pub mod account;
pub mod balance;
pub mod chart;
pub mod config;
pub mod domain;

pub use account::{
    Account, AccountDefinition, AccountError, AccountHandle, AccountRegistry, Scope, ScopeEntity,
    ScopeIdentifier,
};
pub use balance::{BalanceCalculator, BalanceOptions};
pub use chart::{AccountChart, ChartAccount, ChartError, ScopeResolvers};
pub use config::{AccountConfig, ConfigError};
pub use domain::{Currency, Money, ScopeKey};
