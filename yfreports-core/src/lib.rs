//! yfreports core — provider client, payload validation, normalization.
//!
//! This crate holds all domain logic of the report:
//! - Report configuration with the provider's interval/range vocabularies
//! - Minor-unit currency rule shared by both pipelines
//! - Provider client over a swappable blocking HTTP transport
//! - Typed payload validation at the client boundary
//! - Chart and quote normalizers producing flat records

pub mod config;
pub mod currency;
pub mod data;
pub mod normalize;

pub use config::{ChartInterval, ChartRange, ChartSettings, ConfigError, DateBasis, ReportConfig};
pub use currency::CurrencyRule;
pub use data::{DataError, ProviderRequest, YahooClient};
pub use normalize::{ChartPoint, QuoteRecord};
