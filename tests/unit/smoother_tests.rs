use volsmile_rs::prelude::{
    BlackScholes, Curve, CurveSmoother, IVParams, OptionQuote, OptionType, PricingParameters,
    SmoothedCurve, SmootherConfig, VolatilitySurfaceBuilder,
};

const SPOT: f64 = 100.0;

fn curve_from_vols(strikes_and_vols: &[(f64, f64)]) -> Curve {
    let quotes: Vec<OptionQuote> = strikes_and_vols
        .iter()
        .map(|&(strike, vol)| {
            let params = IVParams::put(SPOT, strike, 0.5, 0.01);
            OptionQuote::new(strike, BlackScholes::price(&params, vol))
                .unwrap()
                .with_reference_iv(vol + 0.02)
                .unwrap()
        })
        .collect();
    let pricing = PricingParameters::new(0.01, 0.5).unwrap();
    VolatilitySurfaceBuilder::default().build(&quotes, SPOT, &pricing, OptionType::Put)
}

#[test]
fn test_dense_curve_spans_strike_range() {
    let curve = curve_from_vols(&[
        (80.0, 0.34),
        (90.0, 0.28),
        (100.0, 0.25),
        (110.0, 0.26),
        (120.0, 0.30),
    ]);
    let smoothed = CurveSmoother::default().smooth(&curve);

    let points = smoothed.points();
    assert!(smoothed.is_dense());
    assert_eq!(points.len(), 300);
    assert_eq!(points[0].0, 80.0);
    assert_eq!(points[299].0, 120.0);
    assert!(points.windows(2).all(|w| w[1].0 > w[0].0));

    // Interpolating: passes through every knot
    for knot in curve.points() {
        let (_, vol) = points
            .iter()
            .copied()
            .min_by(|a, b| (a.0 - knot.strike).abs().total_cmp(&(b.0 - knot.strike).abs()))
            .unwrap();
        assert!((vol - knot.implied_vol).abs() < 5e-3);
    }
}

#[test]
fn test_four_points_give_single_cubic() {
    let curve = curve_from_vols(&[(90.0, 0.30), (95.0, 0.27), (105.0, 0.26), (115.0, 0.29)]);
    match CurveSmoother::default().smooth(&curve) {
        SmoothedCurve::Dense(dense) => {
            assert_eq!(dense.len(), 300);
            let (first_strike, first_vol) = dense.samples()[0];
            assert_eq!(first_strike, 90.0);
            assert!((first_vol - 0.30).abs() < 1e-6);
        }
        other => panic!("expected dense curve, got {other:?}"),
    }
}

#[test]
fn test_sparse_curves_pass_through() {
    for count in 0..4 {
        let knots: Vec<(f64, f64)> = [(90.0, 0.3), (100.0, 0.25), (110.0, 0.27)]
            .into_iter()
            .take(count)
            .collect();
        let curve = curve_from_vols(&knots);
        let smoothed = CurveSmoother::default().smooth(&curve);

        assert!(!smoothed.is_dense());
        assert_eq!(smoothed.points(), curve.implied_vol_points().as_slice());
    }
}

#[test]
fn test_reference_curve_is_smoothed_separately() {
    let curve = curve_from_vols(&[
        (80.0, 0.34),
        (90.0, 0.28),
        (100.0, 0.25),
        (110.0, 0.26),
    ]);
    let smoother = CurveSmoother::default();
    let computed = smoother.smooth(&curve);
    let reference = smoother.smooth_reference(&curve);

    assert!(reference.is_dense());
    for (c, r) in computed.points().iter().zip(reference.points()) {
        assert_eq!(c.0, r.0);
        // Reference is the computed smile shifted up by two vol points
        assert!((r.1 - c.1 - 0.02).abs() < 1e-6);
    }
}

#[test]
fn test_custom_sample_count_and_threshold() {
    let curve = curve_from_vols(&[(90.0, 0.3), (100.0, 0.25), (110.0, 0.27)]);
    let smoother = CurveSmoother::new(SmootherConfig {
        samples: 25,
        min_points: 3,
    });

    let smoothed = smoother.smooth(&curve);
    assert!(smoothed.is_dense());
    assert_eq!(smoothed.points().len(), 25);
    // A parabola through the knots hits the middle one exactly
    assert!((smoothed.points()[12].1 - 0.25).abs() < 1e-6);
}
