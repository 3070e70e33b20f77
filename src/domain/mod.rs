//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the normalized series points (`IndexPoint`, `WasteMonthTotal`)
//! - the `TimePoint` trait shared by filtering, charts, and exports
//! - configuration enums (`NullTonnage`)

pub mod types;

pub use types::*;
