use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LedgerError;
use crate::utils::BALANCE_EPSILON;

/// One leg of a journal entry. The account is referenced by display name,
/// not by id, so lines survive chart edits without cascading updates.
/// Exactly one of `debit`/`credit` is non-zero by convention; the model only
/// hard-enforces the entry-level balance invariant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalLine {
    pub account: String,
    #[serde(default)]
    pub debit: f64,
    #[serde(default)]
    pub credit: f64,
}

impl JournalLine {
    pub fn debit(account: impl Into<String>, amount: f64) -> Self {
        Self {
            account: account.into(),
            debit: amount,
            credit: 0.0,
        }
    }

    pub fn credit(account: impl Into<String>, amount: f64) -> Self {
        Self {
            account: account.into(),
            debit: 0.0,
            credit: amount,
        }
    }

    /// Net movement on the debit side (negative = net credit).
    pub fn net(&self) -> f64 {
        self.debit - self.credit
    }
}

/// A balanced double-entry record owned by one entity's ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub currency: String,
    pub memo: String,
    pub entity_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<Uuid>,
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    pub fn new(
        date: NaiveDate,
        currency: impl Into<String>,
        memo: impl Into<String>,
        entity_id: Uuid,
        lines: Vec<JournalLine>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            currency: currency.into(),
            memo: memo.into(),
            entity_id,
            unit_id: None,
            lines,
        }
    }

    pub fn with_unit(mut self, unit_id: Uuid) -> Self {
        self.unit_id = Some(unit_id);
        self
    }

    pub fn total_debits(&self) -> f64 {
        self.lines.iter().map(|line| line.debit).sum()
    }

    pub fn total_credits(&self) -> f64 {
        self.lines.iter().map(|line| line.credit).sum()
    }

    pub fn is_balanced(&self) -> bool {
        (self.total_debits() - self.total_credits()).abs() <= BALANCE_EPSILON
    }

    /// Rejects an unbalanced entry before it is accepted into a ledger.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.is_balanced() {
            Ok(())
        } else {
            Err(LedgerError::Unbalanced {
                debits: self.total_debits(),
                credits: self.total_credits(),
            })
        }
    }
}
