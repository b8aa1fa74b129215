//! Provider seam and structured error types.
//!
//! The HttpTransport trait abstracts the blocking HTTP call so the provider
//! client can be exercised against canned responses in tests.

use reqwest::Url;
use std::fmt;
use thiserror::Error;

/// Parsed JSON body of a successful provider response, shape unchecked.
pub type RawPayload = serde_json::Value;

/// Error taxonomy for fetching and normalizing provider data.
///
/// Every variant is fatal to the run. The binary maps all of them to exit code 1.
#[derive(Debug, Error)]
pub enum DataError {
    /// The HTTP call did not complete, or the body was not JSON.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success status with a provider error body.
    #[error("provider error: Code: {code}. Description: {description}")]
    Provider { code: String, description: String },

    /// Success status, but expected fields are missing or inconsistent.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// A pipeline produced no rows, so there is no column order to write.
    #[error("{pipeline} pipeline produced no rows; nothing to write")]
    EmptyResult { pipeline: String },
}

/// Which provider endpoint a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Chart,
    Quote,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Chart => f.write_str("chart"),
            Endpoint::Quote => f.write_str("quote"),
        }
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One synchronous GET against the provider.
///
/// Implementations carry the client identifier header; the URL arrives fully
/// resolved, query string included.
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &Url) -> Result<HttpResponse, DataError>;
}
