use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LedgerError;

/// A calendar month, the granularity at which schedules post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Absolute month index, used for schedule window arithmetic.
    pub fn month_index(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    /// Months elapsed since `start` (negative if this period precedes it).
    pub fn months_since(&self, start: Period) -> i64 {
        self.month_index() - start.month_index()
    }

    /// Last calendar day of the month, the conventional posting date.
    pub fn end_date(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first| first.pred_opt())
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(self.year, self.month, 28).unwrap())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidPeriod(value.to_string());
        let (year, month) = value.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Period::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Straight-line depreciation schedule for one asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetSchedule {
    pub id: Uuid,
    pub entity_id: Uuid,
    pub name: String,
    pub cost: f64,
    #[serde(default)]
    pub salvage: f64,
    pub life_months: u32,
    pub in_service: Period,
    #[serde(default = "AssetSchedule::default_expense_account")]
    pub expense_account: String,
    #[serde(default = "AssetSchedule::default_accumulated_account")]
    pub accumulated_account: String,
}

impl AssetSchedule {
    pub fn new(
        entity_id: Uuid,
        name: impl Into<String>,
        cost: f64,
        life_months: u32,
        in_service: Period,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity_id,
            name: name.into(),
            cost,
            salvage: 0.0,
            life_months,
            in_service,
            expense_account: Self::default_expense_account(),
            accumulated_account: Self::default_accumulated_account(),
        }
    }

    pub fn default_expense_account() -> String {
        "Depreciation Expense".into()
    }

    pub fn default_accumulated_account() -> String {
        "Accumulated Depreciation".into()
    }
}

/// Straight-line loan amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiabilitySchedule {
    pub id: Uuid,
    pub entity_id: Uuid,
    pub name: String,
    pub principal: f64,
    /// Annual rate in the 0..1 range.
    pub annual_rate: f64,
    pub term_months: u32,
    pub start: Period,
    #[serde(default = "LiabilitySchedule::default_interest_account")]
    pub interest_account: String,
    #[serde(default = "LiabilitySchedule::default_liability_account")]
    pub liability_account: String,
    #[serde(default = "LiabilitySchedule::default_cash_account")]
    pub cash_account: String,
}

impl LiabilitySchedule {
    pub fn new(
        entity_id: Uuid,
        name: impl Into<String>,
        principal: f64,
        annual_rate: f64,
        term_months: u32,
        start: Period,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity_id,
            name: name.into(),
            principal,
            annual_rate,
            term_months,
            start,
            interest_account: Self::default_interest_account(),
            liability_account: Self::default_liability_account(),
            cash_account: Self::default_cash_account(),
        }
    }

    pub fn default_interest_account() -> String {
        "Interest Expense".into()
    }

    pub fn default_liability_account() -> String {
        "Loan Payable".into()
    }

    pub fn default_cash_account() -> String {
        "Cash".into()
    }
}
