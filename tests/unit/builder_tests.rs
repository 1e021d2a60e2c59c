use volsmile_rs::prelude::{
    AdmissibleBand, BlackScholes, IVParams, OptionQuote, OptionType, PricingParameters,
    SolverConfig, VolatilitySurfaceBuilder,
};

const SPOT: f64 = 50.0;
const TIME: f64 = 0.3;
const RATE: f64 = 0.02;

fn quote(strike: f64, vol: f64, option_type: OptionType) -> OptionQuote {
    let params = IVParams::new(SPOT, strike, TIME, RATE, option_type);
    OptionQuote::new(strike, BlackScholes::price(&params, vol)).unwrap()
}

fn pricing() -> PricingParameters {
    PricingParameters::new(RATE, TIME).unwrap()
}

fn noisy_chain(option_type: OptionType) -> Vec<OptionQuote> {
    let mut quotes = vec![
        quote(55.0, 0.31, option_type),
        quote(40.0, 0.42, option_type),
        quote(50.0, 0.33, option_type),
        quote(45.0, 0.37, option_type),
        quote(60.0, 0.32, option_type),
        // stale zero print far out of the money
        OptionQuote::new(120.0, 0.0).unwrap(),
        // stale zero print far in the money
        OptionQuote::new(5.0, 0.0).unwrap(),
    ];
    // price above anything the model can produce
    quotes.push(OptionQuote::new(52.0, 75.0).unwrap());
    quotes
}

#[test]
fn test_band_invariant_and_ordering() {
    let builder = VolatilitySurfaceBuilder::default();
    for option_type in [OptionType::Call, OptionType::Put] {
        let curve = builder.build(&noisy_chain(option_type), SPOT, &pricing(), option_type);

        assert_eq!(curve.option_type(), option_type);
        assert_eq!(curve.len(), 5);
        assert!(
            curve
                .points()
                .iter()
                .all(|p| p.implied_vol > 0.01 && p.implied_vol < 2.0)
        );
        assert!(curve.points().windows(2).all(|w| w[1].strike > w[0].strike));
        assert_eq!(curve.rejections().total(), 3);
    }
}

#[test]
fn test_sides_are_independent() {
    let builder = VolatilitySurfaceBuilder::default();
    let calls = builder.build(
        &noisy_chain(OptionType::Call),
        SPOT,
        &pricing(),
        OptionType::Call,
    );
    let puts = builder.build(
        &[quote(50.0, 0.33, OptionType::Put)],
        SPOT,
        &pricing(),
        OptionType::Put,
    );

    assert_eq!(calls.len(), 5);
    assert_eq!(puts.len(), 1);
    let atm_call = calls.points().iter().find(|p| p.strike == 50.0).unwrap();
    assert!((atm_call.implied_vol - puts.points()[0].implied_vol).abs() < 1e-8);
}

#[test]
fn test_custom_band_and_bracket() {
    let builder = VolatilitySurfaceBuilder::new(
        SolverConfig::default().with_bounds(0.001, 3.0),
        AdmissibleBand::new(0.35, 3.0),
    );
    let quotes = vec![
        quote(40.0, 0.42, OptionType::Call),
        quote(50.0, 0.33, OptionType::Call),
        quote(60.0, 2.5, OptionType::Call),
    ];

    let curve = builder.build(&quotes, SPOT, &pricing(), OptionType::Call);
    let strikes: Vec<f64> = curve.points().iter().map(|p| p.strike).collect();
    assert_eq!(strikes, vec![40.0, 60.0]);
    assert_eq!(curve.rejections().out_of_band, 1);
}

#[test]
fn test_compute_points_keeps_input_order() {
    let quotes = noisy_chain(OptionType::Put);
    let computed = VolatilitySurfaceBuilder::default().compute_points(
        &quotes,
        SPOT,
        &pricing(),
        OptionType::Put,
    );

    assert_eq!(computed.len(), quotes.len());
    for (point, quote) in computed.iter().zip(quotes.iter()) {
        assert_eq!(point.strike, quote.strike());
    }
    assert!(computed[5].implied_vol().is_none());
    assert!(computed[6].implied_vol().is_none());
    assert!(computed[7].implied_vol().is_none());
}

#[test]
fn test_curve_serializes_for_tabular_consumers() {
    let curve = VolatilitySurfaceBuilder::default().build(
        &noisy_chain(OptionType::Call),
        SPOT,
        &pricing(),
        OptionType::Call,
    );
    let json = serde_json::to_value(&curve).unwrap();
    assert_eq!(json["option_type"], "Call");
    assert_eq!(json["points"].as_array().unwrap().len(), 5);
    assert_eq!(json["rejections"]["not_bracketed"], 3);
}
