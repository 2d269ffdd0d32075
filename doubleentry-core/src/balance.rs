//! Boundary to the balance calculation engine.
//!
//! The engine (aggregating persisted ledger lines, locking, etc.) lives
//! outside this crate. Handles only pass themselves and the caller's filter
//! options through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::AccountHandle;
use crate::domain::Money;

/// Filters for a balance query. Forwarded to the calculator verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceOptions {
    /// Start of a time range (inclusive).
    pub from: Option<DateTime<Utc>>,
    /// End of a time range (inclusive).
    pub to: Option<DateTime<Utc>>,
    /// Balance as of this instant.
    pub at: Option<DateTime<Utc>>,
    /// Restrict to lines with this transfer code.
    pub code: Option<String>,
    /// Restrict to lines with any of these transfer codes.
    pub codes: Vec<String>,
}

impl BalanceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to(mut self, to: DateTime<Utc>) -> Self {
        self.to = Some(to);
        self
    }

    pub fn at(mut self, at: DateTime<Utc>) -> Self {
        self.at = Some(at);
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.codes = codes.into_iter().map(Into::into).collect();
        self
    }
}

/// Computes the balance of one account handle.
///
/// Implementations own their I/O and concurrency discipline; the account
/// layer imposes no ordering beyond "return a value for this handle and
/// filter".
pub trait BalanceCalculator {
    type Error;

    fn calculate(&self, account: &AccountHandle, options: &BalanceOptions) -> Result<Money, Self::Error>;
}

impl<C: BalanceCalculator + ?Sized> BalanceCalculator for &C {
    type Error = C::Error;

    fn calculate(&self, account: &AccountHandle, options: &BalanceOptions) -> Result<Money, Self::Error> {
        (**self).calculate(account, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountDefinition, AccountRegistry, Scope, ScopeIdentifier};
    use crate::domain::Currency;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Records every call and answers from a fixed table keyed by handle.
    struct FixedBalances {
        balances: HashMap<AccountHandle, Decimal>,
        calls: RefCell<Vec<(String, BalanceOptions)>>,
    }

    impl BalanceCalculator for FixedBalances {
        type Error = String;

        fn calculate(&self, account: &AccountHandle, options: &BalanceOptions) -> Result<Money, String> {
            self.calls
                .borrow_mut()
                .push((account.hash_key(), options.clone()));
            self.balances
                .get(account)
                .map(|amount| Money::new(*amount, account.currency().clone()))
                .ok_or_else(|| format!("no lines for {account}"))
        }
    }

    fn registry() -> AccountRegistry {
        let mut registry = AccountRegistry::new();
        registry
            .define(AccountDefinition::new("wallet").scoped(ScopeIdentifier::raw("user")))
            .unwrap();
        registry
            .define(AccountDefinition::new("fees").currency("EUR"))
            .unwrap();
        registry
    }

    #[test]
    fn test_balance_forwards_handle_and_options() {
        let registry = registry();
        let wallet = registry.account("wallet", Some(Scope::from(9))).unwrap();
        let calculator = FixedBalances {
            balances: HashMap::from([(wallet.clone(), Decimal::new(2500, 2))]),
            calls: RefCell::new(Vec::new()),
        };

        let at = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let options = BalanceOptions::new().at(at).codes(["deposit", "withdraw"]);

        // A fresh handle for the same scope hits the same entry.
        let lookup = registry.account("wallet", Some(Scope::from("9"))).unwrap();
        let balance = lookup.balance(&calculator, &options).unwrap();

        assert_eq!(balance, Money::new(Decimal::new(2500, 2), Currency::default()));
        let calls = calculator.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "9:wallet");
        assert_eq!(calls[0].1, options);
    }

    #[test]
    fn test_balance_passes_calculator_errors_through() {
        let registry = registry();
        let fees = registry.account("fees", None).unwrap();
        let calculator = FixedBalances {
            balances: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        };
        let err = fees.balance(&calculator, &BalanceOptions::new()).unwrap_err();
        assert_eq!(err, "no lines for Account account: fees scope:  currency: EUR");
    }

    #[test]
    fn test_options_builder() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let options = BalanceOptions::new().from(from).to(to).code("interest");
        assert_eq!(options.from, Some(from));
        assert_eq!(options.to, Some(to));
        assert_eq!(options.at, None);
        assert_eq!(options.code.as_deref(), Some("interest"));
        assert!(options.codes.is_empty());
    }
}
