//! Derives the periodic depreciation and loan-amortization entries for one
//! calendar month.
//!
//! Generated entries are synthetic: they are returned to the caller, never
//! persisted here. Each one carries a deterministic marker in its memo; when
//! a saved entry already contains that exact marker the user has
//! materialized it, and the synthetic duplicate is suppressed.

use uuid::Uuid;

use crate::ledger::{AssetSchedule, JournalEntry, JournalLine, LiabilitySchedule, Period};
use crate::utils::round2;

/// Marker tagged onto a synthetic depreciation entry for one period.
pub fn depreciation_marker(schedule_id: Uuid, period: Period) -> String {
    format!("[auto:dep:{schedule_id}:{period}]")
}

/// Marker tagged onto a synthetic amortization entry for one period.
pub fn amortization_marker(schedule_id: Uuid, period: Period) -> String {
    format!("[auto:amort:{schedule_id}:{period}]")
}

/// Generates the synthetic entries one entity owes for `period`.
pub fn generate_for_period(
    period: Period,
    entity_id: Uuid,
    currency: &str,
    saved_entries: &[JournalEntry],
    assets: &[AssetSchedule],
    liabilities: &[LiabilitySchedule],
) -> Vec<JournalEntry> {
    let mut generated = Vec::new();

    for asset in assets.iter().filter(|a| a.entity_id == entity_id) {
        if let Some(entry) = depreciation_entry(asset, period, currency, saved_entries) {
            generated.push(entry);
        }
    }
    for loan in liabilities.iter().filter(|l| l.entity_id == entity_id) {
        if let Some(entry) = amortization_entry(loan, period, currency, saved_entries) {
            generated.push(entry);
        }
    }

    tracing::debug!(%period, count = generated.len(), "synthetic schedule entries");
    generated
}

/// Straight-line monthly charge, posted for month indexes `0..life_months`
/// relative to the in-service month. Months outside that window, zero
/// charges, and already-materialized periods produce nothing.
fn depreciation_entry(
    asset: &AssetSchedule,
    period: Period,
    currency: &str,
    saved_entries: &[JournalEntry],
) -> Option<JournalEntry> {
    if asset.life_months == 0 {
        return None;
    }
    let index = period.months_since(asset.in_service);
    if index < 0 || index >= asset.life_months as i64 {
        return None;
    }
    let charge = round2((asset.cost - asset.salvage) / asset.life_months as f64);
    if charge <= 0.0 {
        return None;
    }
    let marker = depreciation_marker(asset.id, period);
    if is_materialized(saved_entries, &marker) {
        return None;
    }
    let mut entry = JournalEntry::new(
        period.end_date(),
        currency,
        format!("Depreciation {} {marker}", asset.name),
        asset.entity_id,
        vec![
            JournalLine::debit(asset.expense_account.clone(), charge),
            JournalLine::credit(asset.accumulated_account.clone(), charge),
        ],
    );
    entry.id = synthetic_id(&marker);
    Some(entry)
}

/// Straight-line principal with simple interest on the declining balance:
/// `remaining = principal - per_month * index`, charged at `annual_rate / 12`.
fn amortization_entry(
    loan: &LiabilitySchedule,
    period: Period,
    currency: &str,
    saved_entries: &[JournalEntry],
) -> Option<JournalEntry> {
    if loan.term_months == 0 {
        return None;
    }
    let index = period.months_since(loan.start);
    if index < 0 || index >= loan.term_months as i64 {
        return None;
    }
    let per_month = round2(loan.principal / loan.term_months as f64);
    let remaining = loan.principal - per_month * index as f64;
    let interest = round2(remaining * loan.annual_rate / 12.0);
    let payment = round2(interest + per_month);
    if payment <= 0.0 {
        return None;
    }
    let marker = amortization_marker(loan.id, period);
    if is_materialized(saved_entries, &marker) {
        return None;
    }

    let mut lines = Vec::new();
    if interest > 0.0 {
        lines.push(JournalLine::debit(loan.interest_account.clone(), interest));
    }
    if per_month > 0.0 {
        lines.push(JournalLine::debit(loan.liability_account.clone(), per_month));
    }
    lines.push(JournalLine::credit(loan.cash_account.clone(), payment));

    let mut entry = JournalEntry::new(
        period.end_date(),
        currency,
        format!("Loan payment {} {marker}", loan.name),
        loan.entity_id,
        lines,
    );
    entry.id = synthetic_id(&marker);
    Some(entry)
}

/// Synthetic entries get a name-derived id so repeated generation of the
/// same schedule and period is bit-identical.
fn synthetic_id(marker: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, marker.as_bytes())
}

/// Exact substring check against saved memos, per the marker contract.
fn is_materialized(saved_entries: &[JournalEntry], marker: &str) -> bool {
    saved_entries.iter().any(|entry| entry.memo.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(year: i32, month: u32) -> Period {
        Period::new(year, month).unwrap()
    }

    fn asset(entity_id: Uuid) -> AssetSchedule {
        AssetSchedule::new(entity_id, "Delivery van", 24000.0, 24, period(2025, 1))
    }

    fn loan(entity_id: Uuid) -> LiabilitySchedule {
        LiabilitySchedule::new(entity_id, "Bank loan", 12000.0, 0.12, 12, period(2025, 1))
    }

    #[test]
    fn depreciation_inside_window() {
        let entity_id = Uuid::new_v4();
        let entries =
            generate_for_period(period(2025, 6), entity_id, "AED", &[], &[asset(entity_id)], &[]);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.lines[0], JournalLine::debit("Depreciation Expense", 1000.0));
        assert_eq!(
            entry.lines[1],
            JournalLine::credit("Accumulated Depreciation", 1000.0)
        );
        assert!(entry.is_balanced());
    }

    #[test]
    fn months_outside_window_produce_nothing() {
        let entity_id = Uuid::new_v4();
        let schedule = asset(entity_id);
        for out in [period(2024, 12), period(2027, 1)] {
            let entries =
                generate_for_period(out, entity_id, "AED", &[], &[schedule.clone()], &[]);
            assert!(entries.is_empty(), "unexpected entry for {out}");
        }
    }

    #[test]
    fn interest_declines_with_the_balance() {
        let entity_id = Uuid::new_v4();
        let schedule = loan(entity_id);
        let first =
            generate_for_period(period(2025, 1), entity_id, "AED", &[], &[], &[schedule.clone()]);
        // Month 0: full principal outstanding at 1% per month.
        assert_eq!(first[0].lines[0], JournalLine::debit("Interest Expense", 120.0));
        assert_eq!(first[0].lines[1], JournalLine::debit("Loan Payable", 1000.0));
        assert_eq!(first[0].lines[2], JournalLine::credit("Cash", 1120.0));

        let seventh =
            generate_for_period(period(2025, 7), entity_id, "AED", &[], &[], &[schedule]);
        // Month 6: 6000 remaining.
        assert_eq!(seventh[0].lines[0], JournalLine::debit("Interest Expense", 60.0));
        assert!(seventh[0].is_balanced());
    }

    #[test]
    fn generation_is_idempotent_until_materialized() {
        let entity_id = Uuid::new_v4();
        let schedule = asset(entity_id);
        let target = period(2025, 3);
        let first =
            generate_for_period(target, entity_id, "AED", &[], &[schedule.clone()], &[]);
        let second =
            generate_for_period(target, entity_id, "AED", &[], &[schedule.clone()], &[]);
        assert_eq!(first, second);

        // Saving an entry carrying the marker suppresses the synthetic one.
        let saved = vec![first[0].clone()];
        let third = generate_for_period(target, entity_id, "AED", &saved, &[schedule], &[]);
        assert!(third.is_empty());
    }

    #[test]
    fn other_entities_schedules_are_ignored() {
        let entity_id = Uuid::new_v4();
        let entries = generate_for_period(
            period(2025, 3),
            Uuid::new_v4(),
            "AED",
            &[],
            &[asset(entity_id)],
            &[loan(entity_id)],
        );
        assert!(entries.is_empty());
    }

    #[test]
    fn zero_rate_loan_omits_the_interest_leg() {
        let entity_id = Uuid::new_v4();
        let mut schedule = loan(entity_id);
        schedule.annual_rate = 0.0;
        let entries =
            generate_for_period(period(2025, 1), entity_id, "AED", &[], &[], &[schedule]);
        assert_eq!(entries[0].lines.len(), 2);
        assert_eq!(entries[0].lines[0], JournalLine::debit("Loan Payable", 1000.0));
    }
}
