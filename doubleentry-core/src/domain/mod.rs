//! Value types shared across the account layer.

pub mod ids;
pub mod money;

pub use ids::{Currency, ScopeKey};
pub use money::Money;
