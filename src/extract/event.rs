use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Closed vocabulary of recognized business actions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Borrow,
    Lend,
    Buy,
    Sell,
    Spend,
}

/// One recognized business event, extracted from a single text clause.
///
/// Transient: produced by the extractor and consumed by the composer, never
/// persisted. A clause must carry both an action and an amount to yield an
/// event; everything else is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEvent {
    pub action: ActionKind,
    pub amount: f64,
    pub date: Option<NaiveDate>,
    pub currency: Option<String>,
    pub counterparty: Option<String>,
    pub item: Option<String>,
    pub category_hint: Option<String>,
    /// The original clause, kept for entry memos.
    pub source: String,
}
