//! # volsmile-rs
//!
//! Implied volatility smiles from option quotes.
//!
//! The crate prices European options with the Black-Scholes closed form,
//! inverts observed prices into implied volatilities with a bracketed Brent
//! solver, cleans the results into strike-ordered curves per option side and
//! interpolates those curves into dense sequences for plotting.
//!
//! ## Pipeline
//!
//! 1. [`PricingParameters`](smile::PricingParameters) are derived from the
//!    [`MarketSnapshot`](smile::MarketSnapshot) date and the configured
//!    expiry. An expiry on or before the snapshot date is reported as
//!    [`SmileError::ExpiredContract`](smile::SmileError::ExpiredContract).
//! 2. [`VolatilitySurfaceBuilder`](smile::VolatilitySurfaceBuilder) solves
//!    every [`OptionQuote`](smile::OptionQuote). Quotes whose price cannot be
//!    inverted, or whose volatility falls outside the open band
//!    `(0.01, 2.0)`, are dropped. Survivors are sorted by strike.
//! 3. [`CurveSmoother`](smile::CurveSmoother) fits a not-a-knot cubic spline
//!    through curves with at least four points and samples it 300 times;
//!    shorter curves pass through unchanged.
//! 4. [`SmileReport`](smile::SmileReport) collects both curves and can be
//!    exported as a checksummed JSON package.
//!
//! No file, network or console I/O happens inside the crate. Logging goes
//! through `tracing`; installing a subscriber is left to the application.
//!
//! ## Features
//!
//! - `parallel`: solve quotes with `rayon`. Curve order does not depend on
//!   it, the builder always sorts by strike.
//!
//! ## Example
//!
//! ```ignore
//! use chrono::NaiveDate;
//! use volsmile_rs::prelude::*;
//!
//! let config = AnalysisConfig::new(NaiveDate::from_ymd_opt(2025, 9, 20).unwrap());
//! let analysis = SmileAnalysis::new(config)?;
//! let snapshot = MarketSnapshot::new(201.5, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())?;
//! let result = analysis.run(&snapshot, &calls, &puts)?;
//!
//! for point in result.report.calls.points() {
//!     println!("{:>8.2} {:>6.2}%", point.strike, point.implied_vol * 100.0);
//! }
//! ```

pub mod smile;
pub mod utils;

/// Commonly used types and functions.
pub mod prelude {
    pub use crate::smile::implied_volatility::{
        BlackScholes, IVError, IVParams, IVSolution, OptionType, SolverConfig,
        implied_volatility, solve_iv,
    };
    pub use crate::smile::{
        AdmissibleBand, AnalysisConfig, ComputedPoint, Curve, CurvePoint, CurveSmoother,
        DenseCurve, MarketSnapshot, OptionQuote, PricingParameters, RejectionSummary,
        SMILE_REPORT_FORMAT_VERSION, SmileAnalysis, SmileAnalysisResult, SmileDisplay,
        SmileError, SmileReport, SmileReportPackage, SmoothedCurve, SmootherConfig,
        VolatilitySurfaceBuilder,
    };
}
