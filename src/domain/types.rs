//! Shared domain types.
//!
//! These types are intentionally kept lightweight and `Copy` so they can be:
//!
//! - produced by the provider clients
//! - cached between render passes
//! - exported to CSV or rendered into charts

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Deserialize;

/// FRED series: Producer Price Index for Corrugated and Solid Fiber Box Manufacturing.
pub const DEFAULT_SERIES_ID: &str = "PCU322211322211P";

/// NYC Open Data: DSNY monthly tonnage.
pub const DEFAULT_WASTE_URL: &str = "https://data.cityofnewyork.us/resource/ebb7-mvp5.json";

/// Maximum number of raw waste records requested per fetch (`$limit`).
pub const DEFAULT_WASTE_LIMIT: usize = 5000;

/// Entries on or before this date are dropped (five years of history).
pub fn default_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// One observation of the industrial price index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Combined refuse + paper tonnage for one calendar month.
///
/// `month` is always the first day of the month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WasteMonthTotal {
    pub month: NaiveDate,
    pub total_tons: f64,
}

/// A dated value: the common shape of both dashboard series.
pub trait TimePoint {
    /// Period key (observation date or first day of month).
    fn period(&self) -> NaiveDate;
    /// Plotted value.
    fn level(&self) -> f64;
}

impl TimePoint for IndexPoint {
    fn period(&self) -> NaiveDate {
        self.date
    }

    fn level(&self) -> f64 {
        self.value
    }
}

impl TimePoint for WasteMonthTotal {
    fn period(&self) -> NaiveDate {
        self.month
    }

    fn level(&self) -> f64 {
        self.total_tons
    }
}

/// What to do with a waste record whose refuse or paper tonnage is absent/null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NullTonnage {
    /// Fail the whole batch.
    #[default]
    Fail,
    /// Leave the whole record out of its month total (pandas NaN-skipping sum).
    Skip,
    /// Count only the missing field as zero tons; the other field still counts.
    Zero,
}
