//! Implied volatility smiles built from option quotes.

pub mod analysis;
pub mod builder;
pub mod config;
pub mod error;
pub mod implied_volatility;
pub mod quote;
pub mod smoother;
pub mod snapshot;

pub use analysis::{SmileAnalysis, SmileAnalysisResult, SmileDisplay};
pub use builder::{
    AdmissibleBand, ComputedPoint, Curve, CurvePoint, RejectionSummary, VolatilitySurfaceBuilder,
};
pub use config::AnalysisConfig;
pub use error::SmileError;
pub use quote::{MarketSnapshot, OptionQuote, PricingParameters};
pub use smoother::{CurveSmoother, DenseCurve, SmoothedCurve, SmootherConfig};
pub use snapshot::{SMILE_REPORT_FORMAT_VERSION, SmileReport, SmileReportPackage};
