//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - layers config (defaults, TOML, environment, flags)
//! - installs logging
//! - fetches both series through the cached loader
//! - renders the dashboard to the terminal, text, or HTML

use clap::Parser;

use crate::cli::{Command, HtmlArgs, ReportArgs, SourceArgs};
use crate::config::AppConfig;
use crate::dashboard::Dashboard;
use crate::error::AppError;
use crate::logging::LogTarget;

pub mod pipeline;

/// Entry point for the `trash` binary.
pub fn run() -> Result<(), AppError> {
    // `trash` and `trash --since 2021-01-01` behave like `trash tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Report(args) => handle_report(args),
        Command::Html(args) => handle_html(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    init_logging(&args.source, LogTarget::Stderr)?;
    let config = config_from_args(&args.source)?;
    let mut loader = pipeline::Loader::from_config(&config)?;

    let output = loader.load();
    let dash = Dashboard::build(&output);

    let plot = (!args.no_plot).then_some((args.width, args.height));
    println!("{}", crate::report::format_dashboard(&dash, plot));

    // Optional exports; a failed series exports nothing.
    if let Some(path) = &args.export_index {
        if !output.index.is_empty() {
            crate::io::write_series_csv(path, "index_value", &output.index.items)?;
        }
    }
    if let Some(path) = &args.export_waste {
        if !output.waste.is_empty() {
            crate::io::write_series_csv(path, "total_waste", &output.waste.items)?;
        }
    }

    Ok(())
}

fn handle_html(args: HtmlArgs) -> Result<(), AppError> {
    init_logging(&args.source, LogTarget::Stderr)?;
    let config = config_from_args(&args.source)?;
    let mut loader = pipeline::Loader::from_config(&config)?;

    let dash = Dashboard::build(&loader.load());
    crate::dashboard::html::write_html(&args.out, &dash)?;
    println!("Wrote {}", args.out.display());
    Ok(())
}

fn handle_tui(args: SourceArgs) -> Result<(), AppError> {
    // The TUI owns the terminal; logs only go to a file when asked.
    init_logging(&args, LogTarget::Off)?;
    let config = config_from_args(&args)?;
    let loader = pipeline::Loader::from_config(&config)?;
    crate::tui::run(loader)
}

fn init_logging(args: &SourceArgs, fallback: LogTarget<'_>) -> Result<(), AppError> {
    let target = match &args.log_file {
        Some(path) => LogTarget::File(path),
        None => fallback,
    };
    crate::logging::init(target, &args.log_level)
}

/// Load the layered config and apply CLI overrides on top.
pub fn config_from_args(args: &SourceArgs) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    apply_overrides(&mut config, args)?;
    Ok(config)
}

fn apply_overrides(config: &mut AppConfig, args: &SourceArgs) -> Result<(), AppError> {
    if let Some(key) = &args.fred_api_key {
        config.fred_api_key = Some(key.clone());
    }
    if let Some(series) = &args.series {
        config.series_id = series.clone();
    }
    if let Some(url) = &args.waste_url {
        config.waste_url = url.clone();
    }
    if let Some(limit) = args.limit {
        if limit == 0 {
            return Err(AppError::new(2, "--limit must be at least 1."));
        }
        config.waste_limit = limit;
    }
    if let Some(since) = args.since {
        config.cutoff = since;
    }
    if let Some(policy) = args.null_tonnage {
        config.null_tonnage = policy;
    }
    if args.insecure {
        config.accept_invalid_certs = true;
    }
    if let Some(secs) = args.timeout {
        config.timeout_secs = secs;
    }
    if let Some(secs) = args.cache_ttl {
        config.cache_ttl_secs = secs;
    }
    Ok(())
}

/// Rewrite argv so `trash` defaults to `trash tui`.
///
/// Rules:
/// - `trash`                         -> `trash tui`
/// - `trash --since 2021-01-01 ...`  -> `trash tui --since 2021-01-01 ...`
/// - `trash --help/--version/-h`     -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "report" | "html");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::NullTonnage;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_binary_runs_tui() {
        assert_eq!(rewrite_args(argv(&["trash"])), argv(&["trash", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["trash", "--insecure"])),
            argv(&["trash", "tui", "--insecure"])
        );
        assert_eq!(
            rewrite_args(argv(&["trash", "report", "--no-plot"])),
            argv(&["trash", "report", "--no-plot"])
        );
        assert_eq!(rewrite_args(argv(&["trash", "--help"])), argv(&["trash", "--help"]));
    }

    #[test]
    fn cli_flags_override_config() {
        let cli = crate::cli::Cli::parse_from(argv(&[
            "trash",
            "report",
            "--fred-api-key",
            "abc",
            "--since",
            "2021-06-30",
            "--null-tonnage",
            "zero",
            "--limit",
            "100",
            "--insecure",
            "--timeout",
            "0",
        ]));
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };

        let mut config = AppConfig::default();
        apply_overrides(&mut config, &args.source).unwrap();
        assert_eq!(config.fred_api_key.as_deref(), Some("abc"));
        assert_eq!(config.cutoff, NaiveDate::from_ymd_opt(2021, 6, 30).unwrap());
        assert_eq!(config.null_tonnage, NullTonnage::Zero);
        assert_eq!(config.waste_limit, 100);
        assert!(config.accept_invalid_certs);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.cache_ttl_secs, 3600);
    }

    #[test]
    fn report_plots_unless_disabled() {
        let Command::Report(args) = crate::cli::Cli::parse_from(argv(&["trash", "report"])).command else {
            panic!("expected report");
        };
        assert!(!args.no_plot);

        let Command::Report(args) =
            crate::cli::Cli::parse_from(argv(&["trash", "report", "--no-plot"])).command
        else {
            panic!("expected report");
        };
        assert!(args.no_plot);
        assert!(crate::cli::Cli::try_parse_from(argv(&["trash", "report", "--plot"])).is_err());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let args = SourceArgs {
            limit: Some(0),
            ..SourceArgs::default()
        };
        let err = apply_overrides(&mut AppConfig::default(), &args).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
