//! Example running a full smile analysis on a synthetic option chain
//!
//! This example shows how to:
//! 1. Load an analysis configuration from JSON
//! 2. Price a chain off a known skew and feed it back through the solver
//! 3. Inspect the cleaned curves, the rejections and the dense display curves
//! 4. Export the report as a checksummed JSON package

use chrono::NaiveDate;
use tracing::info;
use volsmile_rs::prelude::{
    AnalysisConfig, BlackScholes, Curve, IVParams, MarketSnapshot, OptionQuote, OptionType,
    SmileAnalysis, SmileDisplay, SmileError, SmileReportPackage,
};

const SPOT: f64 = 201.5;

/// Skewed smile used to generate prices
fn market_vol(strike: f64) -> f64 {
    let moneyness = (strike / SPOT).ln();
    0.27 - 0.12 * moneyness + 0.9 * moneyness * moneyness
}

fn build_chain(
    option_type: OptionType,
    time_to_expiry: f64,
) -> Result<Vec<OptionQuote>, SmileError> {
    let mut quotes = Vec::new();
    for i in 0..25 {
        let strike = 150.0 + 5.0 * i as f64;
        let vol = market_vol(strike);
        let params = IVParams::new(SPOT, strike, time_to_expiry, 0.01, option_type);
        let price = (BlackScholes::price(&params, vol) * 100.0).round() / 100.0;
        let quote = OptionQuote::new(strike, price)?
            .with_reference_iv(vol + 0.005)?
            .with_volume(1000 / (i as u64 + 1));
        quotes.push(quote);
    }

    // Stale print the builder should drop
    quotes.push(OptionQuote::new(400.0, 0.0)?);
    Ok(quotes)
}

fn print_curve(curve: &Curve) {
    info!(
        "{} curve: {} points, {} rejected",
        curve.option_type().as_str(),
        curve.len(),
        curve.rejections().total()
    );
    for point in curve.points() {
        info!(
            "  K={:>7.2}  price={:>7.2}  iv={:>6.2}%  ref={}",
            point.strike,
            point.last_price,
            point.implied_vol * 100.0,
            point
                .reference_iv
                .map(|iv| format!("{:.2}%", iv * 100.0))
                .unwrap_or_else(|| "-".to_string())
        );
    }
}

fn print_display(label: &str, display: &SmileDisplay) {
    let points = display.computed.points();
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        info!(
            "{} display: {} samples from K={:.2} ({:.2}%) to K={:.2} ({:.2}%), dense: {}",
            label,
            points.len(),
            first.0,
            first.1 * 100.0,
            last.0,
            last.1 * 100.0,
            display.computed.is_dense()
        );
    } else {
        info!("{} display: empty", label);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("Starting smile analysis example");

    let config = AnalysisConfig::from_json(
        r#"{
            "expiry": "2025-09-20",
            "risk_free_rate": 0.01,
            "smoother": {"samples": 300}
        }"#,
    )?;
    let as_of = NaiveDate::from_ymd_opt(2025, 6, 2).ok_or("invalid snapshot date")?;
    let snapshot = MarketSnapshot::new(SPOT, as_of)?;

    let analysis = SmileAnalysis::new(config)?;
    let pricing = analysis.pricing_parameters(as_of)?;

    let calls = build_chain(OptionType::Call, pricing.time_to_expiry())?;
    let mut puts = build_chain(OptionType::Put, pricing.time_to_expiry())?;
    // Put priced above the discounted strike, unreachable at any vol
    puts.push(OptionQuote::new(160.0, 170.0)?);

    let result = analysis.run(&snapshot, &calls, &puts)?;

    print_curve(&result.report.calls);
    print_curve(&result.report.puts);
    print_display("call", &result.calls);
    print_display("put", &result.puts);

    if let Some(ceiling) = result.report.vol_ceiling() {
        info!("Shared vol axis ceiling: {:.2}%", ceiling * 100.0);
    }

    let package = SmileReportPackage::new(result.report)?;
    let json = package.to_json()?;
    info!(
        "Report package: version {}, checksum {}, {} bytes",
        package.version,
        package.checksum,
        json.len()
    );

    let restored = SmileReportPackage::from_json(&json)?.into_report()?;
    info!(
        "Restored report with {} points, checksum verified",
        restored.point_count()
    );

    Ok(())
}
