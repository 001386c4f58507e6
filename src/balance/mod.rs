//! Signed opening/closing balances per account.
//!
//! Addition is commutative, so entry order never matters. The chart is never
//! mutated: account names that appear only on entry lines are reported with
//! an implicit zero opening instead of being created.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ledger::{Account, JournalEntry};

/// Sign convention: positive = net debit, negative = net credit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub opening: BTreeMap<String, f64>,
    pub closing: BTreeMap<String, f64>,
}

/// Computes opening and closing balances for one entity's chart and entries.
pub fn compute_balances(accounts: &[Account], entries: &[JournalEntry]) -> BalanceReport {
    let mut opening = BTreeMap::new();
    let mut closing = BTreeMap::new();

    for account in accounts {
        opening.insert(account.name.clone(), account.opening_balance);
        closing.insert(account.name.clone(), account.opening_balance);
    }

    for entry in entries {
        for line in &entry.lines {
            // Dangling names get an implicit zero opening.
            opening.entry(line.account.clone()).or_insert(0.0);
            *closing.entry(line.account.clone()).or_insert(0.0) += line.net();
        }
    }

    BalanceReport { opening, closing }
}

/// Human label for a signed balance: absolute magnitude plus Dr/Cr side.
/// Magnitudes below half a cent snap to `0.00 Dr` to avoid float noise.
pub fn format_balance(value: f64) -> String {
    if value.abs() < 0.005 {
        return "0.00 Dr".to_string();
    }
    if value >= 0.0 {
        format!("{value:.2} Dr")
    } else {
        format!("{:.2} Cr", value.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Account, JournalLine, NormalSide};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn entry(lines: Vec<JournalLine>) -> JournalEntry {
        JournalEntry::new(
            NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            "AED",
            "",
            Uuid::new_v4(),
            lines,
        )
    }

    fn sample_entries() -> Vec<JournalEntry> {
        vec![
            entry(vec![
                JournalLine::debit("Cash", 1000.0),
                JournalLine::credit("Loan Payable", 1000.0),
            ]),
            entry(vec![
                JournalLine::debit("Purchases/Expense", 300.0),
                JournalLine::credit("Cash", 300.0),
            ]),
        ]
    }

    #[test]
    fn closing_adds_net_movement_to_opening() {
        let accounts = vec![
            Account::new("Cash", NormalSide::Debit).with_opening(500.0),
            Account::new("Loan Payable", NormalSide::Credit),
        ];
        let report = compute_balances(&accounts, &sample_entries());
        assert_eq!(report.opening["Cash"], 500.0);
        assert_eq!(report.closing["Cash"], 1200.0);
        assert_eq!(report.closing["Loan Payable"], -1000.0);
    }

    #[test]
    fn entry_only_accounts_get_zero_opening() {
        let report = compute_balances(&[], &sample_entries());
        assert_eq!(report.opening["Purchases/Expense"], 0.0);
        assert_eq!(report.closing["Purchases/Expense"], 300.0);
    }

    #[test]
    fn permuting_entries_never_changes_closing() {
        let accounts = vec![Account::new("Cash", NormalSide::Debit).with_opening(50.0)];
        let mut entries = sample_entries();
        let forward = compute_balances(&accounts, &entries);
        entries.reverse();
        let backward = compute_balances(&accounts, &entries);
        assert_eq!(forward.closing, backward.closing);
    }

    #[test]
    fn formatting_labels_and_noise_snap() {
        assert_eq!(format_balance(1200.0), "1200.00 Dr");
        assert_eq!(format_balance(-415.5), "415.50 Cr");
        assert_eq!(format_balance(0.0049), "0.00 Dr");
        assert_eq!(format_balance(-0.0049), "0.00 Dr");
    }
}
