#![doc(test(attr(deny(warnings))))]

//! Ledger Core turns free-text descriptions of business events into balanced
//! double-entry journal entries, resolves loose account names against a
//! governed chart of accounts, derives recurring depreciation and loan
//! schedules, computes running balances, and rolls entities up into
//! consolidated group balances.
//!
//! The whole crate is synchronous and side-effect free: every component is a
//! pure function from caller-supplied collections to new derived values.
//! Persistence, presentation, and concurrency control live outside.

pub mod balance;
pub mod config;
pub mod consolidate;
pub mod errors;
pub mod extract;
pub mod ledger;
pub mod recurring;
pub mod resolve;
pub mod synth;
pub mod utils;

use std::sync::Once;

use uuid::Uuid;

use config::ComposerDefaults;
use extract::ExtractOptions;
use ledger::JournalEntry;
use synth::SynthOutcome;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Ledger Core tracing initialized.");
    });
}

/// Full text-to-ledger result: accepted entries plus the raw account names
/// that could not be matched to the chart.
#[derive(Debug, Clone, Default)]
pub struct ComposeResult {
    pub entries: Vec<JournalEntry>,
    pub unresolved: Vec<String>,
}

/// Runs the whole pipeline: extract events from `text`, then compose one
/// balanced entry per event against the given chart allow-list.
pub fn compose_text(
    text: &str,
    options: &ExtractOptions,
    defaults: &ComposerDefaults,
    chart_names: &[String],
    entity_id: Uuid,
) -> ComposeResult {
    let events = extract::extract_events(text, options);
    let mut result = ComposeResult::default();
    for event in &events {
        let SynthOutcome { entry, unresolved } =
            synth::synthesize(event, defaults, chart_names, entity_id, options.today);
        result.entries.extend(entry);
        result.unresolved.extend(unresolved);
    }
    result
}
