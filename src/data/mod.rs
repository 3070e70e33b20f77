//! Provider clients and the table operations behind them.
//!
//! The two source traits are the seam between fetching and rendering: the
//! render pass only sees "something that yields a series or a `FetchError`".

pub mod fred;
pub mod transform;
pub mod waste;

pub use fred::FredClient;
pub use waste::{WasteClient, WasteRecord};

use crate::domain::{IndexPoint, WasteMonthTotal};
use crate::error::FetchError;

/// Source of the industrial price index.
pub trait IndexSource {
    /// Ascending points after the configured cutoff.
    fn fetch_index(&self, series_id: &str) -> Result<Vec<IndexPoint>, FetchError>;
}

/// Source of monthly waste tonnage.
pub trait WasteSource {
    /// Ascending monthly totals after the configured cutoff.
    fn fetch_waste(&self) -> Result<Vec<WasteMonthTotal>, FetchError>;
}
