use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LedgerError;

/// The side on which an account ordinarily carries a positive balance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NormalSide {
    Debit,
    Credit,
}

/// An account in a chart of accounts. Entries refer to accounts by display
/// name (a weak reference); a dangling name never corrupts balances, it just
/// shows up in reports as a zero-opening key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub normal_side: NormalSide,
    /// Signed: positive = net debit.
    #[serde(default)]
    pub opening_balance: f64,
}

impl Account {
    /// Creates a new account with a zero opening balance.
    pub fn new(name: impl Into<String>, normal_side: NormalSide) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            normal_side,
            opening_balance: 0.0,
        }
    }

    pub fn with_opening(mut self, opening_balance: f64) -> Self {
        self.opening_balance = opening_balance;
        self
    }
}

/// A chart of accounts for one entity. Display names are unique within a
/// chart; the pipeline never mutates a chart, it only reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub accounts: Vec<Account>,
}

impl Chart {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    pub fn account(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.name == name)
    }

    pub fn require(&self, name: &str) -> Result<&Account, LedgerError> {
        self.account(name)
            .ok_or_else(|| LedgerError::InvalidRef(format!("no account named {name:?}")))
    }

    /// Allow-list of account names, in chart order.
    pub fn names(&self) -> Vec<String> {
        self.accounts
            .iter()
            .map(|account| account.name.clone())
            .collect()
    }

    /// A minimal chart covering the composer's fixed posting templates.
    pub fn standard() -> Self {
        let names = [
            ("Cash", NormalSide::Debit),
            ("Accounts Receivable", NormalSide::Debit),
            ("Loan Receivable", NormalSide::Debit),
            ("Input VAT", NormalSide::Debit),
            ("Purchases/Expense", NormalSide::Debit),
            ("Accounts Payable", NormalSide::Credit),
            ("Loan Payable", NormalSide::Credit),
            ("Output VAT", NormalSide::Credit),
            ("Revenue", NormalSide::Credit),
        ];
        Self {
            accounts: names
                .into_iter()
                .map(|(name, side)| Account::new(name, side))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_chart_covers_posting_accounts() {
        let chart = Chart::standard();
        for name in ["Cash", "Loan Payable", "Revenue", "Purchases/Expense"] {
            assert!(chart.account(name).is_some(), "missing {name}");
        }
        assert_eq!(
            chart.account("Revenue").unwrap().normal_side,
            NormalSide::Credit
        );
    }

    #[test]
    fn opening_balance_builder() {
        let account = Account::new("Cash", NormalSide::Debit).with_opening(250.0);
        assert_eq!(account.opening_balance, 250.0);
    }

    #[test]
    fn require_reports_missing_names() {
        let chart = Chart::standard();
        assert!(chart.require("Cash").is_ok());
        let err = chart.require("Goodwill").expect_err("must be missing");
        assert!(err.to_string().contains("Goodwill"));
    }
}
