//! Composes balanced journal entries from parsed events.
//!
//! Every action kind maps to a fixed debit/credit template; amounts are
//! VAT-split where applicable and rounded to two decimals at the point of
//! computation. The templates always balance by construction, but the
//! composer still rechecks totals and drops anything off by more than the
//! balance epsilon rather than emit a corrupt entry.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::config::ComposerDefaults;
use crate::extract::{ActionKind, ParsedEvent};
use crate::ledger::{JournalEntry, JournalLine};
use crate::resolve::{Resolution, Resolver};
use crate::utils::{round2, BALANCE_EPSILON};

pub const CASH: &str = "Cash";
pub const LOAN_PAYABLE: &str = "Loan Payable";
pub const LOAN_RECEIVABLE: &str = "Loan Receivable";
pub const ACCOUNTS_PAYABLE: &str = "Accounts Payable";
pub const ACCOUNTS_RECEIVABLE: &str = "Accounts Receivable";
pub const REVENUE: &str = "Revenue";
pub const INPUT_VAT: &str = "Input VAT";
pub const OUTPUT_VAT: &str = "Output VAT";

/// Result of composing one event. Unresolved raw account names are data,
/// not errors: the caller decides whether to prompt the user.
#[derive(Debug, Clone, Default)]
pub struct SynthOutcome {
    pub entry: Option<JournalEntry>,
    pub unresolved: Vec<String>,
}

/// Amount split into net, tax, and gross portions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VatSplit {
    pub base: f64,
    pub vat: f64,
    pub total: f64,
}

/// Splits an amount per the configured VAT mode. A non-positive rate means
/// no VAT; inclusive mode carves the tax out of the stated amount, exclusive
/// mode adds it on top.
pub fn split_vat(amount: f64, rate: f64, inclusive: bool) -> VatSplit {
    if rate <= 0.0 {
        let amount = round2(amount);
        return VatSplit {
            base: amount,
            vat: 0.0,
            total: amount,
        };
    }
    if inclusive {
        let base = round2(amount / (1.0 + rate));
        VatSplit {
            base,
            vat: round2(amount - base),
            total: round2(amount),
        }
    } else {
        let vat = round2(amount * rate);
        VatSplit {
            base: round2(amount),
            vat,
            total: round2(amount + vat),
        }
    }
}

/// Builds a balanced entry for one event, or none if the event's template
/// output fails the balance recheck.
pub fn synthesize(
    event: &ParsedEvent,
    defaults: &ComposerDefaults,
    chart_names: &[String],
    entity_id: Uuid,
    fallback_date: NaiveDate,
) -> SynthOutcome {
    let mut unresolved = Vec::new();
    let date = event.date.unwrap_or(fallback_date);
    let currency = event
        .currency
        .clone()
        .unwrap_or_else(|| defaults.currency.clone());
    let amount = round2(event.amount);

    let lines = match event.action {
        ActionKind::Borrow => vec![
            JournalLine::debit(CASH, amount),
            JournalLine::credit(LOAN_PAYABLE, amount),
        ],
        ActionKind::Lend => vec![
            JournalLine::debit(LOAN_RECEIVABLE, amount),
            JournalLine::credit(CASH, amount),
        ],
        ActionKind::Buy => {
            let split = split_vat(
                amount,
                defaults.effective_vat_rate(),
                defaults.vat_inclusive,
            );
            let category = category_account(event, defaults, chart_names, &mut unresolved);
            let mut lines = vec![JournalLine::debit(category, split.base)];
            if split.vat > 0.0 {
                lines.push(JournalLine::debit(INPUT_VAT, split.vat));
            }
            lines.push(JournalLine::credit(settlement_credit(defaults), split.total));
            lines
        }
        ActionKind::Sell => {
            let split = split_vat(
                amount,
                defaults.effective_vat_rate(),
                defaults.vat_inclusive,
            );
            let receivable = if defaults.use_arap { ACCOUNTS_RECEIVABLE } else { CASH };
            let mut lines = vec![
                JournalLine::debit(receivable, split.total),
                JournalLine::credit(REVENUE, split.base),
            ];
            if split.vat > 0.0 {
                lines.push(JournalLine::credit(OUTPUT_VAT, split.vat));
            }
            lines
        }
        ActionKind::Spend => {
            let category = category_account(event, defaults, chart_names, &mut unresolved);
            vec![
                JournalLine::debit(category, amount),
                JournalLine::credit(settlement_credit(defaults), amount),
            ]
        }
    };

    let entry = JournalEntry::new(date, currency, memo_for(event), entity_id, lines);
    if !entry.is_balanced() {
        tracing::warn!(
            action = ?event.action,
            debits = entry.total_debits(),
            credits = entry.total_credits(),
            epsilon = BALANCE_EPSILON,
            "template produced an unbalanced entry; dropping it"
        );
        return SynthOutcome {
            entry: None,
            unresolved,
        };
    }

    SynthOutcome {
        entry: Some(entry),
        unresolved,
    }
}

fn settlement_credit(defaults: &ComposerDefaults) -> &'static str {
    if defaults.use_arap {
        ACCOUNTS_PAYABLE
    } else {
        CASH
    }
}

/// Resolves the category hint (then the item) against the chart. The hint is
/// only ever a hint: when nothing matches, the line reroutes to the default
/// expense account and the raw name is reported back as unresolved.
fn category_account(
    event: &ParsedEvent,
    defaults: &ComposerDefaults,
    chart_names: &[String],
    unresolved: &mut Vec<String>,
) -> String {
    let resolver = Resolver::new(
        chart_names,
        defaults.resolver_threshold,
        &defaults.default_expense_account,
    );
    let hint = event
        .category_hint
        .as_deref()
        .or(event.item.as_deref());
    match hint {
        Some(raw) => match resolver.resolve(raw, true) {
            Resolution::Matched(name) => name,
            Resolution::Fallback(name) => {
                unresolved.push(raw.to_string());
                name
            }
            // Unreachable for pure-debit lines, but keep the reroute total.
            Resolution::Unresolved => {
                unresolved.push(raw.to_string());
                defaults.default_expense_account.clone()
            }
        },
        None => defaults.default_expense_account.clone(),
    }
}

fn memo_for(event: &ParsedEvent) -> String {
    if event.source.is_empty() {
        format!("{:?} {:.2}", event.action, event.amount)
    } else {
        event.source.clone()
    }
}
