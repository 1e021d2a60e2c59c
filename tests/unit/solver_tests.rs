use volsmile_rs::prelude::{
    BlackScholes, IVError, IVParams, OptionType, SolverConfig, implied_volatility, solve_iv,
};

#[test]
fn test_round_trip_recovers_volatility() {
    let config = SolverConfig::default();
    let vols = [0.011, 0.05, 0.12, 0.25, 0.4, 0.75, 1.1, 1.49];

    for option_type in [OptionType::Call, OptionType::Put] {
        for strike in [90.0, 100.0, 110.0] {
            for time in [0.25, 0.5, 1.0] {
                for &vol in &vols {
                    if vol < 0.05 && strike != 100.0 {
                        // Price vanishes off the money at very low vol
                        continue;
                    }
                    let params = IVParams::new(100.0, strike, time, 0.01, option_type);
                    let price = BlackScholes::price(&params, vol);
                    let solution = solve_iv(&params, price, &config).unwrap();
                    assert!(
                        (solution.iv - vol).abs() < 1e-4,
                        "{option_type:?} K={strike} T={time}: expected {vol}, got {}",
                        solution.iv
                    );
                }
            }
        }
    }
}

#[test]
fn test_reference_scenario() {
    let iv = implied_volatility(5.88, 100.0, 100.0, 0.5, 0.01, OptionType::Call).unwrap();
    assert!((iv - 0.20).abs() < 1e-3);
}

#[test]
fn test_missing_below_lower_bound() {
    // Lower bound is S - K·e^(-rT) ≈ 20.40
    let iv = implied_volatility(15.0, 100.0, 80.0, 0.5, 0.01, OptionType::Call);
    assert_eq!(iv, None);

    // Put lower bound K·e^(-rT) - S ≈ 19.40
    let iv = implied_volatility(10.0, 100.0, 120.0, 0.5, 0.01, OptionType::Put);
    assert_eq!(iv, None);
}

#[test]
fn test_missing_above_spot_for_call() {
    let iv = implied_volatility(100.5, 100.0, 100.0, 0.5, 0.01, OptionType::Call);
    assert_eq!(iv, None);
}

#[test]
fn test_missing_above_bracket_top() {
    // Reachable only with vol above the 200% bracket
    let params = IVParams::call(100.0, 100.0, 0.5, 0.01);
    let price = BlackScholes::price(&params, 2.5);
    let result = solve_iv(&params, price, &SolverConfig::default());
    assert!(matches!(result, Err(IVError::RootNotBracketed { .. })));

    // A wider bracket finds it
    let wide = SolverConfig::default().with_bounds(0.001, 4.0);
    let solution = solve_iv(&params, price, &wide).unwrap();
    assert!((solution.iv - 2.5).abs() < 1e-6);
}

#[test]
fn test_zero_price_far_otm_is_missing() {
    let iv = implied_volatility(0.0, 100.0, 300.0, 0.5, 0.01, OptionType::Call);
    assert_eq!(iv, None);
}

#[test]
fn test_solver_is_deterministic() {
    let params = IVParams::put(100.0, 95.0, 0.75, 0.02);
    let first = solve_iv(&params, 4.2, &SolverConfig::default()).unwrap();
    let second = solve_iv(&params, 4.2, &SolverConfig::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_residual_is_small() {
    let params = IVParams::call(100.0, 105.0, 0.5, 0.01);
    let solution = solve_iv(&params, 3.1, &SolverConfig::default()).unwrap();
    assert!(solution.residual.abs() < 1e-9);
    let repriced = BlackScholes::price(&params, solution.iv);
    assert!((repriced - 3.1).abs() < 1e-9);
}
