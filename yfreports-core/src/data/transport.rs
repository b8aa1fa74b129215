//! HttpTransport implementations: blocking reqwest, and an in-memory replay.

use super::provider::{DataError, HttpResponse, HttpTransport};
use crate::config::ProviderSettings;
use reqwest::Url;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Blocking reqwest client carrying the configured `User-Agent`.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(settings: &ProviderSettings) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| DataError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, DataError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| DataError::Transport(format!("GET {url}: {e}")))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| DataError::Transport(format!("read body of {url}: {e}")))?;
        Ok(HttpResponse { status, body })
    }
}

/// Replays queued responses in order and records every requested URL.
///
/// Used for offline runs and tests. An exhausted queue is a transport error.
#[derive(Debug, Default)]
pub struct ReplayTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requested: Mutex<Vec<Url>>,
}

impl ReplayTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and body.
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.lock_responses()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    /// Queue a connection failure.
    pub fn fail(self, reason: impl Into<String>) -> Self {
        self.lock_responses().push_back(Err(reason.into()));
        self
    }

    /// URLs requested so far, in order.
    pub fn requested(&self) -> Vec<Url> {
        self.requested
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lock_responses().len()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<HttpResponse, String>>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HttpTransport for ReplayTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, DataError> {
        self.requested
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(url.clone());
        match self.lock_responses().pop_front() {
            Some(Ok(resp)) => Ok(resp),
            Some(Err(reason)) => Err(DataError::Transport(format!("GET {url}: {reason}"))),
            None => Err(DataError::Transport(format!(
                "GET {url}: no replay response queued"
            ))),
        }
    }
}
