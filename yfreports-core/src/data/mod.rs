//! Provider access: transport seam, Yahoo client, typed payload validation.

pub mod payload;
pub mod provider;
pub mod transport;
pub mod yahoo;

pub use payload::{ChartSeries, QuoteEntry};
pub use provider::{DataError, Endpoint, HttpResponse, HttpTransport, RawPayload};
pub use transport::{ReplayTransport, ReqwestTransport};
pub use yahoo::{ProviderRequest, YahooClient};
