//! yfreports runner — pipeline orchestration and CSV export.
//!
//! This crate builds on `yfreports-core` to provide:
//! - A shared fetch → validate → normalize → flatten driver for both pipelines
//! - Row sets whose column order comes from the first record
//! - Staged CSV export that replaces targets only when every file is complete

pub mod export;
pub mod pipeline;
pub mod report;
pub mod table;

pub use export::{stage_csv, write_csv, ExportError, StagedFile};
pub use pipeline::{
    run_chart_pipeline, run_pipeline, run_quote_pipeline, ChartKind, PayloadKind, QuoteKind,
};
pub use report::{run_report, ReportError, ReportSummary};
pub use table::{RowSet, TabularRecord};
