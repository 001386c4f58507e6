use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an entity participates in group consolidation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsolidationMethod {
    #[default]
    Full,
    Equity,
    None,
}

/// Account names used to net intercompany positions at consolidation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntercompanyMap {
    #[serde(default)]
    pub enabled: bool,
    pub receivable: String,
    pub payable: String,
    pub loan_receivable: String,
    pub loan_payable: String,
}

impl Default for IntercompanyMap {
    fn default() -> Self {
        Self {
            enabled: false,
            receivable: "Accounts Receivable".into(),
            payable: "Accounts Payable".into(),
            loan_receivable: "Intercompany Loan Receivable".into(),
            loan_payable: "Intercompany Loan Payable".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsolidationPolicy {
    /// Ownership percentage in the 0..1 range.
    pub ownership: f64,
    #[serde(default)]
    pub method: ConsolidationMethod,
    pub functional_currency: String,
    #[serde(default)]
    pub intercompany: IntercompanyMap,
}

impl Default for ConsolidationPolicy {
    fn default() -> Self {
        Self {
            ownership: 1.0,
            method: ConsolidationMethod::Full,
            functional_currency: "AED".into(),
            intercompany: IntercompanyMap::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BusinessUnit {
    pub id: Uuid,
    pub name: String,
}

impl BusinessUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A legal entity owning one ledger context. Entities form a flat set; a
/// "group" exists only through consolidation policy, never as a structural
/// parent/child link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    pub id: Uuid,
    pub name: String,
    pub base_currency: String,
    #[serde(default)]
    pub units: Vec<BusinessUnit>,
    #[serde(default)]
    pub policy: ConsolidationPolicy,
}

impl Entity {
    pub fn new(name: impl Into<String>, base_currency: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            base_currency: base_currency.into(),
            units: Vec::new(),
            policy: ConsolidationPolicy::default(),
        }
    }

    pub fn add_unit(&mut self, unit: BusinessUnit) -> Uuid {
        let id = unit.id;
        self.units.push(unit);
        id
    }

    pub fn unit(&self, id: Uuid) -> Option<&BusinessUnit> {
        self.units.iter().find(|unit| unit.id == id)
    }
}
