//! Command-line parsing for the Trash Index dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fetch/transform code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::NullTonnage;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "trash",
    version,
    about = "The Trash Index: cardboard PPI vs NYC waste tonnage dashboard"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive terminal dashboard (default).
    Tui(SourceArgs),
    /// Print the dashboard as text, with ASCII charts and optional CSV exports.
    Report(ReportArgs),
    /// Write the dashboard as a single HTML page with SVG charts.
    Html(HtmlArgs),
}

/// Where the data comes from and how it is fetched.
///
/// Every flag here overrides the config file and the environment.
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// TOML config file.
    #[arg(long, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// FRED API key (otherwise FRED_API_KEY from the environment or .env).
    #[arg(long, value_name = "KEY")]
    pub fred_api_key: Option<String>,

    /// FRED series id for the industrial index.
    #[arg(long, value_name = "ID")]
    pub series: Option<String>,

    /// Socrata resource URL for the waste records.
    #[arg(long, value_name = "URL")]
    pub waste_url: Option<String>,

    /// Maximum number of raw waste records to request.
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Keep only entries strictly after this date (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub since: Option<NaiveDate>,

    /// What to do with records missing a tonnage field.
    #[arg(long, value_enum)]
    pub null_tonnage: Option<NullTonnage>,

    /// Skip TLS certificate verification (opt-in, insecure).
    #[arg(long)]
    pub insecure: bool,

    /// Per-request timeout in seconds (0 disables it).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Fetch cache time-to-live in seconds (0 keeps results until cleared).
    #[arg(long, value_name = "SECS")]
    pub cache_ttl: Option<u64>,

    /// Write logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Default log level when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Options for the text report.
#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Skip the ASCII charts (they are drawn by default).
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 15)]
    pub height: usize,

    /// Export the industrial index series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_index: Option<PathBuf>,

    /// Export the monthly waste totals to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_waste: Option<PathBuf>,
}

/// Options for the HTML page.
#[derive(Debug, Args, Clone)]
pub struct HtmlArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output file.
    #[arg(short, long, default_value = "trash_index.html")]
    pub out: PathBuf,
}
