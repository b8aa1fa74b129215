//! Full report run: both pipelines, then both files.

use crate::export::{stage_csv, ExportError};
use crate::pipeline::{run_chart_pipeline, run_quote_pipeline};
use std::path::PathBuf;
use thiserror::Error;
use yfreports_core::config::ReportConfig;
use yfreports_core::data::{DataError, HttpTransport, YahooClient};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// What a successful run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub chart_path: PathBuf,
    pub chart_rows: usize,
    pub quote_path: PathBuf,
    pub quote_rows: usize,
}

/// Fetch and normalize both pipelines, then replace both output files.
///
/// Nothing is written until both row sets exist, and both files are staged
/// before either target is replaced.
pub fn run_report<T: HttpTransport>(
    client: &YahooClient<T>,
    config: &ReportConfig,
) -> Result<ReportSummary, ReportError> {
    let chart = run_chart_pipeline(client, config)?;
    let quote = run_quote_pipeline(client, config)?;

    let chart_file = stage_csv(&config.output.chart_path, &chart)?;
    let quote_file = stage_csv(&config.output.quote_path, &quote)?;

    let chart_rows = chart_file.rows();
    let quote_rows = quote_file.rows();
    let chart_path = chart_file.commit()?;
    let quote_path = quote_file.commit()?;

    Ok(ReportSummary {
        chart_path,
        chart_rows,
        quote_path,
        quote_rows,
    })
}
