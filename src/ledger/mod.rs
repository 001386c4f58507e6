//! Core accounting data model: accounts, entries, entities, and schedules.

pub mod account;
pub mod entity;
pub mod entry;
pub mod schedule;

pub use account::{Account, Chart, NormalSide};
pub use entity::{
    BusinessUnit, ConsolidationMethod, ConsolidationPolicy, Entity, IntercompanyMap,
};
pub use entry::{JournalEntry, JournalLine};
pub use schedule::{AssetSchedule, LiabilitySchedule, Period};
