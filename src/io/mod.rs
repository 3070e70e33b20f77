//! Input/output helpers.
//!
//! - series exports to CSV (`export`)

pub mod export;

pub use export::*;
