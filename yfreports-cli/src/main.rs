//! yfreports CLI — fetch chart and quote reports into CSV files.
//!
//! With no arguments, reads `yfreports.toml` from the working directory when
//! present (built-in defaults otherwise), runs the chart pipeline and then
//! the quote pipeline, and writes both CSV files. Any error exits with code 1.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use yfreports_core::config::ReportConfig;
use yfreports_core::data::YahooClient;
use yfreports_runner::run_report;

const DEFAULT_CONFIG: &str = "yfreports.toml";

#[derive(Parser)]
#[command(
    name = "yfreports",
    version,
    about = "Yahoo Finance reports — chart and quote data as CSV"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to ./yfreports.toml if it exists.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print every raw provider payload.
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Override the configured symbols (comma-separated, order kept).
    #[arg(long, value_delimiter = ',')]
    symbols: Option<Vec<String>>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let status = exit_status(run(cli), &mut std::io::stderr());
    ExitCode::from(status)
}

/// Process exit status for a finished run. Failures print their full cause
/// chain to `err` and exit with 1.
fn exit_status(result: Result<()>, err: &mut impl Write) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            // Nothing more to do if stderr itself is gone.
            let _ = writeln!(err, "Error: {e:#}");
            1
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if cli.debug {
        config.debug = true;
    }
    if let Some(symbols) = cli.symbols {
        config.symbols = symbols
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    tracing::info!(
        symbols = config.symbols.len(),
        interval = %config.chart.interval,
        range = %config.chart.range,
        "starting report"
    );

    let client = YahooClient::connect(config.provider.clone(), config.debug)
        .context("failed to set up provider client")?;

    let summary = run_report(&client, &config)?;

    println!(
        "Chart data: {} rows -> {}",
        summary.chart_rows,
        summary.chart_path.display()
    );
    println!(
        "Quote data: {} rows -> {}",
        summary.quote_rows,
        summary.quote_path.display()
    );

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig> {
    match path {
        Some(path) => ReportConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => {
            let default = Path::new(DEFAULT_CONFIG);
            if default.exists() {
                ReportConfig::from_file(default)
                    .with_context(|| format!("failed to load config {DEFAULT_CONFIG}"))
            } else {
                Ok(ReportConfig::default())
            }
        }
    }
}
