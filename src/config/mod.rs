use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Defaults the entry composer applies when an event does not state its own.
///
/// Supplied by the caller (the persistence/UI layer owns where these live
/// between sessions); the core only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComposerDefaults {
    pub currency: String,
    #[serde(default)]
    pub vat_enabled: bool,
    /// Flat VAT rate in the 0..1 range.
    #[serde(default)]
    pub vat_rate: f64,
    /// Whether stated amounts already contain VAT.
    #[serde(default)]
    pub vat_inclusive: bool,
    /// Post purchases/sales through AR/AP instead of cash.
    #[serde(default)]
    pub use_arap: bool,
    #[serde(default = "ComposerDefaults::default_expense_account")]
    pub default_expense_account: String,
    #[serde(default = "ComposerDefaults::default_threshold")]
    pub resolver_threshold: f64,
}

impl Default for ComposerDefaults {
    fn default() -> Self {
        Self {
            currency: "AED".into(),
            vat_enabled: false,
            vat_rate: 0.05,
            vat_inclusive: true,
            use_arap: false,
            default_expense_account: Self::default_expense_account(),
            resolver_threshold: Self::default_threshold(),
        }
    }
}

impl ComposerDefaults {
    pub fn default_expense_account() -> String {
        "Purchases/Expense".into()
    }

    pub fn default_threshold() -> f64 {
        0.72
    }

    /// Effective VAT rate: zero when VAT is disabled.
    pub fn effective_vat_rate(&self) -> f64 {
        if self.vat_enabled {
            self.vat_rate
        } else {
            0.0
        }
    }

    pub fn from_json(data: &str) -> Result<Self, LedgerError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn to_json(&self) -> Result<String, LedgerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
