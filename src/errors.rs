use thiserror::Error;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid reference: {0}")]
    InvalidRef(String),
    #[error("Unbalanced entry: debits {debits:.2} != credits {credits:.2}")]
    Unbalanced { debits: f64, credits: f64 },
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
}
