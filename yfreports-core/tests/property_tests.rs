//! Property tests for normalization invariants.
//!
//! Uses proptest to verify:
//! 1. Point count — N timestamp/close pairs yield exactly N chart points
//! 2. Order — points follow source timestamp order
//! 3. Idempotence — the currency rule only fires on the minor-unit code
//! 4. Accuracy — converted amounts equal original / divisor within 1e-9
//! 5. Quote count — one record per result entry

use proptest::prelude::*;
use serde_json::json;
use yfreports_core::config::DateBasis;
use yfreports_core::currency::CurrencyRule;
use yfreports_core::normalize::{normalize_chart, normalize_quotes};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_currency() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("ZAc"), Just("ZAR"), Just("USD"), Just("EUR"), Just("GBp")]
}

fn arb_series() -> impl Strategy<Value = (Vec<i64>, Vec<f64>)> {
    prop::collection::vec((0..2_000_000_000_i64, 0.01..1_000_000.0_f64), 1..60)
        .prop_map(|pairs| pairs.into_iter().unzip())
}

fn chart_payload(currency: &str, timestamps: &[i64], closes: &[f64]) -> serde_json::Value {
    json!({
        "chart": {"result": [{
            "meta": {"currency": currency, "symbol": "PROP"},
            "timestamp": timestamps,
            "indicators": {"quote": [{"close": closes}]}
        }]}
    })
}

// ── 1 & 2. Count and order ───────────────────────────────────────────

proptest! {
    #[test]
    fn chart_point_per_pair_in_source_order(
        currency in arb_currency(),
        (timestamps, closes) in arb_series(),
    ) {
        let payload = chart_payload(currency, &timestamps, &closes);
        let points = normalize_chart(&payload, DateBasis::Utc, &CurrencyRule::default()).unwrap();

        prop_assert_eq!(points.len(), timestamps.len());
        for (point, &ts) in points.iter().zip(&timestamps) {
            let expected = chrono::DateTime::from_timestamp(ts, 0).unwrap().date_naive();
            prop_assert_eq!(point.date, expected);
        }
    }

    #[test]
    fn chart_prices_have_two_fractional_digits(
        currency in arb_currency(),
        (timestamps, closes) in arb_series(),
    ) {
        let payload = chart_payload(currency, &timestamps, &closes);
        let points = normalize_chart(&payload, DateBasis::Utc, &CurrencyRule::default()).unwrap();
        for point in &points {
            let cents = point.price * 100.0;
            prop_assert!((cents - cents.round()).abs() < 1e-6, "{}", point.price);
        }
    }
}

// ── 3 & 4. Currency rule ─────────────────────────────────────────────

proptest! {
    #[test]
    fn currency_rule_idempotent(
        currency in arb_currency(),
        amounts in prop::collection::vec(0.0..1e7_f64, 1..10),
    ) {
        let rule = CurrencyRule::default();
        let mut once = amounts.clone();
        let tag = rule.normalize(currency, &mut once);

        let mut twice = once.clone();
        let tag_again = rule.normalize(&tag, &mut twice);

        prop_assert_eq!(&tag, &tag_again);
        prop_assert_eq!(once, twice);
        prop_assert_ne!(tag.as_str(), "ZAc");
    }

    #[test]
    fn currency_rule_accurate_before_rounding(
        amounts in prop::collection::vec(0.0..1e7_f64, 1..10),
    ) {
        let rule = CurrencyRule::default();
        let mut converted = amounts.clone();
        prop_assert_eq!(rule.normalize("ZAc", &mut converted), "ZAR");
        for (after, before) in converted.iter().zip(&amounts) {
            prop_assert!((after - before / 100.0).abs() < 1e-9);
        }
    }
}

// ── 5. Quote count ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn one_quote_record_per_entry(
        entries in prop::collection::vec((arb_currency(), 0.01..1e5_f64), 0..25),
    ) {
        let result: Vec<serde_json::Value> = entries
            .iter()
            .enumerate()
            .map(|(i, (currency, price))| json!({
                "symbol": format!("S{i}"),
                "currency": currency,
                "regularMarketPrice": price,
                "fiftyTwoWeekLow": price / 2.0,
                "fiftyTwoWeekHigh": price * 2.0,
                "shortName": format!(" Name {i} "),
                "typeDisp": "Equity",
                "quoteType": "EQUITY",
                "region": "US"
            }))
            .collect();
        let payload = json!({"quoteResponse": {"result": result}});

        let records = normalize_quotes(&payload, &CurrencyRule::default()).unwrap();
        prop_assert_eq!(records.len(), entries.len());
        for (i, record) in records.iter().enumerate() {
            prop_assert_eq!(&record.symbol, &format!("S{i}"));
            prop_assert_eq!(&record.short_name, &format!("Name {i}"));
            prop_assert!(record.low52 <= record.price && record.price <= record.high52);
        }
    }
}
