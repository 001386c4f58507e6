//! Multi-entity roll-up with intercompany elimination.
//!
//! Entities are a flat set; the "group" is whichever entity the caller
//! designates, and its consolidation policy drives elimination. Equity-method
//! entities are summed into the group total exactly like fully-consolidated
//! ones. That is a known MVP simplification, kept visible here rather than
//! silently corrected.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::balance::{compute_balances, BalanceReport};
use crate::ledger::{Account, ConsolidationMethod, Entity, JournalEntry};
use crate::utils::round2;

#[derive(Debug, Clone)]
pub struct ConsolidationInput<'a> {
    pub entities: &'a [Entity],
    pub accounts_by_entity: &'a BTreeMap<Uuid, Vec<Account>>,
    pub entries: &'a [JournalEntry],
    pub group_entity_id: Uuid,
}

/// One side of an applied intercompany elimination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Elimination {
    pub account: String,
    pub amount: f64,
    pub note: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsolidationReport {
    pub included: Vec<Uuid>,
    pub by_entity: BTreeMap<Uuid, BalanceReport>,
    pub group: BalanceReport,
    pub eliminations: Vec<Elimination>,
}

/// Rolls included entities' balances into a group total and nets the
/// configured intercompany pairs.
pub fn consolidate(input: &ConsolidationInput<'_>) -> ConsolidationReport {
    let mut report = ConsolidationReport::default();

    for entity in input.entities {
        if !is_included(entity, input.group_entity_id) {
            continue;
        }
        report.included.push(entity.id);

        let accounts = input
            .accounts_by_entity
            .get(&entity.id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let entries: Vec<JournalEntry> = input
            .entries
            .iter()
            .filter(|entry| entry.entity_id == entity.id)
            .cloned()
            .collect();
        let balances = compute_balances(accounts, &entries);

        for (name, value) in &balances.opening {
            *report.group.opening.entry(name.clone()).or_insert(0.0) += value;
        }
        for (name, value) in &balances.closing {
            *report.group.closing.entry(name.clone()).or_insert(0.0) += value;
        }
        report.by_entity.insert(entity.id, balances);
    }

    if let Some(group_entity) = input
        .entities
        .iter()
        .find(|entity| entity.id == input.group_entity_id)
    {
        if group_entity.policy.intercompany.enabled {
            let map = &group_entity.policy.intercompany;
            let pairs = [
                (map.receivable.as_str(), map.payable.as_str()),
                (map.loan_receivable.as_str(), map.loan_payable.as_str()),
            ];
            for (debit_side, credit_side) in pairs {
                eliminate_pair(&mut report, debit_side, credit_side);
            }
        }
    }

    report
}

/// The group entity is always in; anyone else needs a live policy.
fn is_included(entity: &Entity, group_entity_id: Uuid) -> bool {
    entity.id == group_entity_id
        || (entity.policy.method != ConsolidationMethod::None && entity.policy.ownership > 0.0)
}

/// Nets one configured pair on the group closing balances. Elimination only
/// fires when the sides carry opposite signs; same-signed or zero pairs are
/// left alone so anomalies stay visible as missing eliminations.
fn eliminate_pair(report: &mut ConsolidationReport, left: &str, right: &str) {
    let left_balance = report.group.closing.get(left).copied().unwrap_or(0.0);
    let right_balance = report.group.closing.get(right).copied().unwrap_or(0.0);

    let (debit_name, debit_value, credit_name, credit_value) =
        if left_balance > 0.0 && right_balance < 0.0 {
            (left, left_balance, right, right_balance)
        } else if right_balance > 0.0 && left_balance < 0.0 {
            (right, right_balance, left, left_balance)
        } else {
            return;
        };

    let amount = round2(debit_value.min(credit_value.abs()));
    if amount <= 0.0 {
        return;
    }

    *report.group.closing.get_mut(debit_name).unwrap() = round2(debit_value - amount);
    *report.group.closing.get_mut(credit_name).unwrap() = round2(credit_value + amount);

    let note = format!("Intercompany elimination: {debit_name} vs {credit_name}");
    report.eliminations.push(Elimination {
        account: debit_name.to_string(),
        amount,
        note: note.clone(),
    });
    report.eliminations.push(Elimination {
        account: credit_name.to_string(),
        amount,
        note,
    });
    tracing::debug!(debit = debit_name, credit = credit_name, amount, "eliminated pair");
}
