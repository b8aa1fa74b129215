//! Report configuration.
//!
//! Loaded from a TOML file. Every section has a default, so an empty file
//! produces the built-in report: ten symbols, quarterly closes over ten years.

use crate::currency::CurrencyRule;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Yahoo Finance chart endpoint (symbol is appended as a path segment).
pub const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance quote endpoint.
pub const DEFAULT_QUOTE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid chart interval '{0}' (valid: 1m, 2m, 5m, 15m, 30m, 90m, 1h, 1d, 5d, 1wk, 1mo, 3mo)")]
    InvalidInterval(String),

    #[error("invalid chart range '{0}' (valid: 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max)")]
    InvalidRange(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete configuration for one report run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Symbols in output order. Duplicates are kept.
    pub symbols: Vec<String>,
    /// Dump every raw payload to stdout.
    pub debug: bool,
    pub chart: ChartSettings,
    pub output: OutputPaths,
    pub provider: ProviderSettings,
    pub currency: CurrencyRule,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            symbols: [
                "VOO", "QQQ", "^RUT", "URTH", "IWV", "VRTTX", "STXRAF.JO", "SYGEU.JO", "AGGE.AS",
                "GC=F",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            debug: false,
            chart: ChartSettings::default(),
            output: OutputPaths::default(),
            provider: ProviderSettings::default(),
            currency: CurrencyRule::default(),
        }
    }
}

impl ReportConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would only fail later, mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "provider.user_agent must not be empty (the provider rejects default clients)"
                    .into(),
            ));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid("provider.timeout_secs must be positive".into()));
        }
        if self.output.chart_path.as_os_str().is_empty()
            || self.output.quote_path.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid("output paths must not be empty".into()));
        }
        if self.output.chart_path == self.output.quote_path {
            return Err(ConfigError::Invalid(
                "output.chart_path and output.quote_path must differ".into(),
            ));
        }
        self.currency.validate().map_err(ConfigError::Invalid)
    }
}

/// Chart request settings shared by every symbol.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChartSettings {
    pub interval: ChartInterval,
    pub range: ChartRange,
    pub date_basis: DateBasis,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            interval: ChartInterval::ThreeMonths,
            range: ChartRange::TenYears,
            date_basis: DateBasis::Local,
        }
    }
}

/// How UNIX timestamps become calendar dates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateBasis {
    /// Truncate in the host's local time zone.
    #[default]
    Local,
    /// Truncate in UTC.
    Utc,
}

/// Output file locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputPaths {
    pub chart_path: PathBuf,
    pub quote_path: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            chart_path: PathBuf::from("out/chart-data.csv"),
            quote_path: PathBuf::from("out/quote-data.csv"),
        }
    }
}

/// Provider endpoints and client identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderSettings {
    pub chart_url: String,
    pub quote_url: String,
    /// Sent as `User-Agent`. The provider answers 403 to generic identifiers.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            chart_url: DEFAULT_CHART_URL.into(),
            quote_url: DEFAULT_QUOTE_URL.into(),
            user_agent: concat!("yfreports/", env!("CARGO_PKG_VERSION")).into(),
            timeout_secs: 30,
        }
    }
}

/// Declares a closed vocabulary enum that round-trips through its wire string.
macro_rules! wire_vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $err:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every accepted value, in provider order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The provider's wire string.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(ConfigError::$err(other.to_string())),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = ConfigError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> String {
                v.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_vocabulary! {
    /// Chart data granularity.
    ChartInterval, InvalidInterval {
        OneMinute => "1m",
        TwoMinutes => "2m",
        FiveMinutes => "5m",
        FifteenMinutes => "15m",
        ThirtyMinutes => "30m",
        NinetyMinutes => "90m",
        OneHour => "1h",
        OneDay => "1d",
        FiveDays => "5d",
        OneWeek => "1wk",
        OneMonth => "1mo",
        ThreeMonths => "3mo",
    }
}

wire_vocabulary! {
    /// Chart lookback window.
    ChartRange, InvalidRange {
        OneDay => "1d",
        FiveDays => "5d",
        OneMonth => "1mo",
        ThreeMonths => "3mo",
        SixMonths => "6mo",
        OneYear => "1y",
        TwoYears => "2y",
        FiveYears => "5y",
        TenYears => "10y",
        YearToDate => "ytd",
        Max => "max",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = ReportConfig::from_toml("").unwrap();
        assert_eq!(config, ReportConfig::default());
        assert_eq!(config.symbols.len(), 10);
        assert_eq!(config.chart.interval, ChartInterval::ThreeMonths);
        assert_eq!(config.chart.range, ChartRange::TenYears);
        assert_eq!(config.currency.minor_code, "ZAc");
    }

    #[test]
    fn partial_toml_overrides_only_given_fields() {
        let config = ReportConfig::from_toml(
            r#"
symbols = ["AAPL", "MTN.JO"]
debug = true

[chart]
interval = "1wk"
range = "ytd"
date_basis = "utc"

[output]
chart_path = "var/chart.csv"
"#,
        )
        .unwrap();

        assert_eq!(config.symbols, vec!["AAPL", "MTN.JO"]);
        assert!(config.debug);
        assert_eq!(config.chart.interval, ChartInterval::OneWeek);
        assert_eq!(config.chart.range, ChartRange::YearToDate);
        assert_eq!(config.chart.date_basis, DateBasis::Utc);
        assert_eq!(config.output.chart_path, PathBuf::from("var/chart.csv"));
        assert_eq!(config.output.quote_path, PathBuf::from("out/quote-data.csv"));
    }

    #[test]
    fn unknown_interval_is_config_error() {
        let err = ReportConfig::from_toml("[chart]\ninterval = \"4h\"\n").unwrap_err();
        assert!(err.to_string().contains("4h"), "{err}");
    }

    #[test]
    fn unknown_range_is_config_error() {
        assert!(matches!(
            "3y".parse::<ChartRange>(),
            Err(ConfigError::InvalidRange(v)) if v == "3y"
        ));
        assert!(ReportConfig::from_toml("[chart]\nrange = \"forever\"\n").is_err());
    }

    #[test]
    fn vocabularies_round_trip_wire_strings() {
        for interval in ChartInterval::ALL {
            assert_eq!(interval.as_str().parse::<ChartInterval>().unwrap(), *interval);
        }
        for range in ChartRange::ALL {
            assert_eq!(range.to_string().parse::<ChartRange>().unwrap(), *range);
        }
        assert_eq!(ChartInterval::ALL.len(), 12);
        assert_eq!(ChartRange::ALL.len(), 11);
    }

    #[test]
    fn empty_user_agent_rejected() {
        let err = ReportConfig::from_toml("[provider]\nuser_agent = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn same_output_paths_rejected() {
        let err = ReportConfig::from_toml(
            "[output]\nchart_path = \"a.csv\"\nquote_path = \"a.csv\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_currency_rule_rejected() {
        let err = ReportConfig::from_toml("[currency]\ndivisor = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn example_config_matches_defaults() {
        let example = include_str!("../../yfreports.example.toml");
        let config = ReportConfig::from_toml(example).unwrap();
        assert_eq!(config.symbols, ReportConfig::default().symbols);
        assert_eq!(config.chart, ChartSettings::default());
        assert_eq!(config.currency, CurrencyRule::default());
    }

    #[test]
    fn default_config_survives_toml_roundtrip() {
        let config = ReportConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = ReportConfig::from_toml(&text).unwrap();
        assert_eq!(config, parsed);
    }
}
