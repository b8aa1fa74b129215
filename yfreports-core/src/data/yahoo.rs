//! Yahoo Finance provider client.
//!
//! Builds chart and quote request URLs, performs one GET per request through
//! the transport, and classifies the response. No retries: the first failure
//! is returned to the caller, which decides whether the run ends.

use super::payload::{provider_error, ChartSeries, QuoteEntry};
use super::provider::{DataError, Endpoint, HttpTransport, RawPayload};
use super::transport::ReqwestTransport;
use crate::config::{ChartSettings, ProviderSettings};
use reqwest::Url;

/// A single provider request: endpoint plus query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub endpoint: Endpoint,
    /// Symbols covered by this request, for tracing.
    pub symbols: Vec<String>,
    /// Query parameters in wire order.
    pub params: Vec<(String, String)>,
}

impl ProviderRequest {
    /// Time series for one symbol.
    pub fn chart(symbol: &str, chart: &ChartSettings) -> Self {
        Self {
            endpoint: Endpoint::Chart,
            symbols: vec![symbol.to_string()],
            params: vec![
                ("interval".into(), chart.interval.to_string()),
                ("range".into(), chart.range.to_string()),
            ],
        }
    }

    /// Snapshot for one or more symbols in a single batched call.
    pub fn quote(symbols: &[String]) -> Self {
        Self {
            endpoint: Endpoint::Quote,
            symbols: symbols.to_vec(),
            params: vec![("symbols".into(), symbols.join(","))],
        }
    }

    /// Human-readable description of the requested symbols.
    pub fn describe_symbols(&self) -> String {
        self.symbols.join(",")
    }
}

/// Client for the provider's chart and quote endpoints.
pub struct YahooClient<T: HttpTransport> {
    transport: T,
    settings: ProviderSettings,
    debug: bool,
}

impl YahooClient<ReqwestTransport> {
    /// Client backed by a real blocking HTTP transport.
    pub fn connect(settings: ProviderSettings, debug: bool) -> Result<Self, DataError> {
        let transport = ReqwestTransport::new(&settings)?;
        Ok(Self::new(transport, settings, debug))
    }
}

impl<T: HttpTransport> YahooClient<T> {
    pub fn new(transport: T, settings: ProviderSettings, debug: bool) -> Self {
        Self {
            transport,
            settings,
            debug,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fully resolved URL for a request, query string included.
    pub fn request_url(&self, request: &ProviderRequest) -> Result<Url, DataError> {
        let mut url = match request.endpoint {
            Endpoint::Chart => {
                let symbol = request.symbols.first().ok_or_else(|| {
                    DataError::Transport("chart request without a symbol".into())
                })?;
                let mut url = parse_base(&self.settings.chart_url)?;
                url.path_segments_mut()
                    .map_err(|_| {
                        DataError::Transport(format!(
                            "chart URL cannot take a path: {}",
                            self.settings.chart_url
                        ))
                    })?
                    .pop_if_empty()
                    .push(symbol);
                url
            }
            Endpoint::Quote => parse_base(&self.settings.quote_url)?,
        };
        url.query_pairs_mut().extend_pairs(
            request
                .params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        Ok(url)
    }

    /// Perform one request and return the parsed JSON body on success.
    ///
    /// Failure statuses become `Provider` errors when the body carries a
    /// provider error object; unparseable bodies become `Transport` errors.
    pub fn fetch(&self, request: &ProviderRequest) -> Result<RawPayload, DataError> {
        let url = self.request_url(request)?;
        tracing::info!(
            endpoint = %request.endpoint,
            symbols = %request.describe_symbols(),
            url = %url,
            "requesting provider"
        );

        let resp = self.transport.get(&url)?;

        let body: RawPayload = serde_json::from_str(&resp.body).map_err(|e| {
            DataError::Transport(format!(
                "HTTP {} from {url}: body is not JSON: {e}",
                resp.status
            ))
        })?;

        if !resp.is_success() {
            let (code, description) = provider_error(&body).unwrap_or_else(|| {
                (
                    format!("HTTP {}", resp.status),
                    status_reason(resp.status).to_string(),
                )
            });
            tracing::error!(
                status = resp.status,
                code = %code,
                description = %description,
                "provider rejected request for {}",
                request.describe_symbols()
            );
            return Err(DataError::Provider { code, description });
        }

        if self.debug {
            match serde_json::to_string_pretty(&body) {
                Ok(pretty) => println!("{pretty}"),
                Err(e) => tracing::warn!("could not pretty-print payload: {e}"),
            }
        }

        Ok(body)
    }

    /// Fetch and validate the time series for one symbol.
    pub fn fetch_chart(
        &self,
        symbol: &str,
        chart: &ChartSettings,
    ) -> Result<ChartSeries, DataError> {
        let payload = self.fetch(&ProviderRequest::chart(symbol, chart))?;
        ChartSeries::from_payload(&payload)
    }

    /// Fetch and validate snapshots for all symbols in one call.
    pub fn fetch_quotes(&self, symbols: &[String]) -> Result<Vec<QuoteEntry>, DataError> {
        let payload = self.fetch(&ProviderRequest::quote(symbols))?;
        QuoteEntry::from_payload(&payload)
    }
}

fn parse_base(base: &str) -> Result<Url, DataError> {
    Url::parse(base).map_err(|e| DataError::Transport(format!("invalid provider URL '{base}': {e}")))
}

fn status_reason(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChartInterval, ChartRange, DateBasis};
    use crate::data::transport::ReplayTransport;

    fn settings() -> ChartSettings {
        ChartSettings {
            interval: ChartInterval::ThreeMonths,
            range: ChartRange::TenYears,
            date_basis: DateBasis::Utc,
        }
    }

    fn client(transport: ReplayTransport) -> YahooClient<ReplayTransport> {
        YahooClient::new(transport, ProviderSettings::default(), false)
    }

    #[test]
    fn chart_url_matches_wire_contract() {
        let c = client(ReplayTransport::new());
        let url = c
            .request_url(&ProviderRequest::chart("VOO", &settings()))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://query1.finance.yahoo.com/v8/finance/chart/VOO?interval=3mo&range=10y"
        );
    }

    #[test]
    fn chart_url_encodes_symbol_path_segment() {
        let c = client(ReplayTransport::new());
        let url = c
            .request_url(&ProviderRequest::chart("^RUT", &settings()))
            .unwrap();
        assert_eq!(url.path_segments().unwrap().last(), Some("^RUT"));

        let url = c
            .request_url(&ProviderRequest::chart("A/B", &settings()))
            .unwrap();
        assert!(url.path().ends_with("/chart/A%2FB"), "{}", url.path());
    }

    #[test]
    fn quote_url_joins_symbols() {
        let c = client(ReplayTransport::new());
        let symbols = vec!["VOO".to_string(), "STXRAF.JO".to_string()];
        let url = c.request_url(&ProviderRequest::quote(&symbols)).unwrap();
        assert_eq!(url.path(), "/v7/finance/quote");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("symbols".into(), "VOO,STXRAF.JO".into())]);
    }

    #[test]
    fn success_returns_body_regardless_of_shape() {
        let c = client(ReplayTransport::new().respond(200, r#"{"anything": [1, 2]}"#));
        let payload = c
            .fetch(&ProviderRequest::chart("VOO", &settings()))
            .unwrap();
        assert_eq!(payload["anything"][1], 2);
    }

    #[test]
    fn failure_status_extracts_provider_error() {
        let c = client(ReplayTransport::new().respond(
            403,
            r#"{"chart": {"error": {"code": "Not Found", "description": "No data"}}}"#,
        ));
        let err = c
            .fetch(&ProviderRequest::chart("NOPE", &settings()))
            .unwrap_err();
        match err {
            DataError::Provider { code, description } => {
                assert_eq!(code, "Not Found");
                assert_eq!(description, "No data");
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn failure_status_without_error_object_uses_status() {
        let c = client(ReplayTransport::new().respond(429, r#"{"finance": null}"#));
        let err = c
            .fetch(&ProviderRequest::quote(&["VOO".to_string()]))
            .unwrap_err();
        assert!(
            matches!(err, DataError::Provider { ref code, ref description }
                if code == "HTTP 429" && description == "Too Many Requests"),
            "{err:?}"
        );
    }

    #[test]
    fn unparseable_body_is_transport_error() {
        let c = client(ReplayTransport::new().respond(500, "<html>Oops</html>"));
        let err = c
            .fetch(&ProviderRequest::chart("VOO", &settings()))
            .unwrap_err();
        assert!(matches!(err, DataError::Transport(_)));

        let c = client(ReplayTransport::new().respond(200, "not json"));
        assert!(matches!(
            c.fetch(&ProviderRequest::chart("VOO", &settings())),
            Err(DataError::Transport(_))
        ));
    }

    #[test]
    fn connection_failure_is_transport_error() {
        let c = client(ReplayTransport::new().fail("connection refused"));
        assert!(matches!(
            c.fetch_quotes(&["VOO".to_string()]),
            Err(DataError::Transport(_))
        ));
    }

    #[test]
    fn fetch_chart_validates_payload() {
        let c = client(ReplayTransport::new().respond(200, r#"{"chart": {"result": []}}"#));
        assert!(matches!(
            c.fetch_chart("VOO", &settings()),
            Err(DataError::MalformedPayload(_))
        ));
    }

    #[test]
    fn one_request_per_fetch() {
        let c = client(
            ReplayTransport::new()
                .respond(403, r#"{"quote": {"error": {"code": "x", "description": "y"}}}"#)
                .respond(200, "{}"),
        );
        assert!(c.fetch_quotes(&["A".to_string()]).is_err());
        assert_eq!(c.transport().requested().len(), 1);
        assert_eq!(c.transport().remaining(), 1);
    }

    #[test]
    fn custom_base_url_is_respected() {
        let provider = ProviderSettings {
            chart_url: "http://localhost:8080/chart/".into(),
            ..ProviderSettings::default()
        };
        let c = YahooClient::new(ReplayTransport::new(), provider, false);
        let url = c
            .request_url(&ProviderRequest::chart("GC=F", &settings()))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/chart/GC=F?interval=3mo&range=10y"
        );
    }
}
