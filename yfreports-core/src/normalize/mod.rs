//! Payload normalization into flat output records.
//!
//! Both normalizers apply the same currency rule; neither touches raw JSON
//! keys directly.

pub mod chart;
pub mod quote;

pub use chart::{normalize_chart, normalize_series, ChartPoint};
pub use quote::{normalize_entry, normalize_quotes, QuoteRecord};
