//! `trash-index` library crate.
//!
//! The binary (`trash`) is a thin wrapper around this library so that:
//!
//! - fetch, transform, and presentation logic is testable without spawning processes
//! - the same dashboard model feeds the TUI, the text report, and the HTML page

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
