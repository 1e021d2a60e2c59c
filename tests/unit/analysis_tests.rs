use chrono::NaiveDate;
use volsmile_rs::prelude::{
    AnalysisConfig, MarketSnapshot, OptionQuote, SmileAnalysis, SmileError, SmileReportPackage,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

// Trimmed chain in the upstream column layout, including a stale zero print
// and a quote priced above the spot.
const CALLS_JSON: &str = r#"[
    {"strike": 170.0, "lastPrice": 34.10, "impliedVolatility": 0.41, "volume": 12},
    {"strike": 185.0, "lastPrice": 22.35, "impliedVolatility": 0.36, "volume": 40},
    {"strike": 195.0, "lastPrice": 15.90, "impliedVolatility": 0.33, "volume": 210},
    {"strike": 200.0, "lastPrice": 13.20, "impliedVolatility": 0.32, "volume": 905},
    {"strike": 205.0, "lastPrice": 10.85, "impliedVolatility": 0.31},
    {"strike": 215.0, "lastPrice": 7.05, "impliedVolatility": 0.30, "volume": 88},
    {"strike": 230.0, "lastPrice": 3.60, "impliedVolatility": 0.29, "volume": 15},
    {"strike": 400.0, "lastPrice": 0.0, "impliedVolatility": 0.0},
    {"strike": 150.0, "lastPrice": 250.0}
]"#;

const PUTS_JSON: &str = r#"[
    {"strike": 185.0, "lastPrice": 7.40, "impliedVolatility": 0.37},
    {"strike": 200.0, "lastPrice": 12.60, "impliedVolatility": 0.33},
    {"strike": 215.0, "lastPrice": 20.30, "impliedVolatility": 0.31}
]"#;

fn load(json: &str) -> Vec<OptionQuote> {
    serde_json::from_str(json).unwrap()
}

fn run() -> volsmile_rs::prelude::SmileAnalysisResult {
    let config = AnalysisConfig::from_json(r#"{"expiry": "2025-09-20"}"#).unwrap();
    let snapshot = MarketSnapshot::new(201.5, date(2025, 6, 2)).unwrap();
    SmileAnalysis::new(config)
        .unwrap()
        .run(&snapshot, &load(CALLS_JSON), &load(PUTS_JSON))
        .unwrap()
}

#[test]
fn test_json_chain_end_to_end() {
    let result = run();
    let report = &result.report;

    assert!((report.pricing.time_to_expiry() - 110.0 / 365.0).abs() < 1e-12);
    assert_eq!(report.calls.len(), 7);
    assert_eq!(report.calls.rejections().not_bracketed, 2);
    assert_eq!(report.puts.len(), 3);

    for curve in [&report.calls, &report.puts] {
        assert!(curve.points().windows(2).all(|w| w[1].strike > w[0].strike));
        assert!(
            curve
                .points()
                .iter()
                .all(|p| p.implied_vol > 0.01 && p.implied_vol < 2.0)
        );
    }

    assert!(result.calls.computed.is_dense());
    assert_eq!(result.calls.computed.points().len(), 300);
    assert!(!result.puts.computed.is_dense());
    assert_eq!(result.puts.computed.points().len(), 3);
}

#[test]
fn test_expiry_before_snapshot_is_fatal() {
    let config = AnalysisConfig::new(date(2025, 6, 20));
    let snapshot = MarketSnapshot::new(201.5, date(2025, 7, 1)).unwrap();
    let result = SmileAnalysis::new(config)
        .unwrap()
        .run(&snapshot, &load(CALLS_JSON), &load(PUTS_JSON));

    match result {
        Err(SmileError::ExpiredContract {
            as_of,
            expiry,
            time_to_expiry,
        }) => {
            assert_eq!(as_of, date(2025, 7, 1));
            assert_eq!(expiry, date(2025, 6, 20));
            assert!(time_to_expiry < 0.0);
        }
        other => panic!("expected ExpiredContract, got {other:?}"),
    }
}

#[test]
fn test_invalid_quote_rejected_on_load() {
    let result = serde_json::from_str::<Vec<OptionQuote>>(
        r#"[{"strike": 100.0, "lastPrice": -2.0}]"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_invalid_config_rejected_on_load() {
    let result = AnalysisConfig::from_json(
        r#"{"expiry": "2025-09-20", "solver": {"min_iv": 2.0, "max_iv": 1.0}}"#,
    );
    assert!(matches!(result, Err(SmileError::InvalidConfig { .. })));

    let result = AnalysisConfig::from_json(r#"{"risk_free_rate": 0.02}"#);
    assert!(matches!(result, Err(SmileError::DeserializationError { .. })));
}

#[test]
fn test_report_package_survives_json() {
    let report = run().report;
    let json = SmileReportPackage::new(report.clone())
        .unwrap()
        .to_json()
        .unwrap();

    let restored = SmileReportPackage::from_json(&json)
        .unwrap()
        .into_report()
        .unwrap();
    assert_eq!(restored, report);
}
