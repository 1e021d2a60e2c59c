use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use volsmile_rs::prelude::{
    BlackScholes, CurveSmoother, IVParams, OptionQuote, OptionType, PricingParameters,
    SolverConfig, VolatilitySurfaceBuilder, solve_iv,
};

const SPOT: f64 = 100.0;
const TIME: f64 = 0.5;
const RATE: f64 = 0.01;

fn smile_vol(strike: f64) -> f64 {
    let moneyness = (strike / SPOT).ln();
    0.2 - 0.15 * moneyness + 0.8 * moneyness * moneyness
}

fn chain(count: usize) -> Vec<OptionQuote> {
    (0..count)
        .filter_map(|i| {
            let strike = 60.0 + 80.0 * i as f64 / count as f64;
            let params = IVParams::call(SPOT, strike, TIME, RATE);
            OptionQuote::new(strike, BlackScholes::price(&params, smile_vol(strike))).ok()
        })
        .collect()
}

fn bench_pricing(c: &mut Criterion) {
    let params = IVParams::call(SPOT, 105.0, TIME, RATE);
    c.bench_function("black_scholes_price", |b| {
        b.iter(|| BlackScholes::price(black_box(&params), black_box(0.25)))
    });
}

fn bench_solver(c: &mut Criterion) {
    let config = SolverConfig::default();
    let mut group = c.benchmark_group("solve_iv");
    for (label, strike) in [("atm", 100.0), ("otm", 130.0), ("itm", 75.0)] {
        let params = IVParams::call(SPOT, strike, TIME, RATE);
        let price = BlackScholes::price(&params, smile_vol(strike));
        group.bench_function(label, |b| {
            b.iter(|| solve_iv(black_box(&params), black_box(price), &config))
        });
    }
    group.finish();
}

fn bench_build_and_smooth(c: &mut Criterion) {
    let quotes = chain(200);
    let pricing = PricingParameters::new(RATE, TIME).unwrap();
    let builder = VolatilitySurfaceBuilder::default();
    let smoother = CurveSmoother::default();

    let mut group = c.benchmark_group("curve");
    group.throughput(Throughput::Elements(quotes.len() as u64));
    group.bench_function("build", |b| {
        b.iter(|| builder.build(black_box(&quotes), SPOT, &pricing, OptionType::Call))
    });

    let curve = builder.build(&quotes, SPOT, &pricing, OptionType::Call);
    group.bench_function("smooth", |b| b.iter(|| smoother.smooth(black_box(&curve))));
    group.finish();
}

criterion_group!(benches, bench_pricing, bench_solver, bench_build_and_smooth);
criterion_main!(benches);
