//! End-to-end smile analysis for one option chain.
//!
//! This module provides [`SmileAnalysis`], which ties the pieces together:
//! it derives the pricing parameters from the market snapshot, builds the
//! call and put curves, smooths them for display and assembles the report.

use chrono::NaiveDate;
use tracing::info;

use super::builder::VolatilitySurfaceBuilder;
use super::config::AnalysisConfig;
use super::error::SmileError;
use super::implied_volatility::OptionType;
use super::quote::{MarketSnapshot, OptionQuote, PricingParameters};
use super::smoother::{CurveSmoother, SmoothedCurve};
use super::snapshot::SmileReport;
use crate::utils::current_time_millis;

/// Display data for one option side.
#[derive(Debug, Clone, PartialEq)]
pub struct SmileDisplay {
    /// Smoothed computed implied volatilities.
    pub computed: SmoothedCurve,
    /// Smoothed reference implied volatilities from the data source.
    pub reference: SmoothedCurve,
}

/// Everything a run produces: the report for tabular consumers and the
/// dense curves for plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct SmileAnalysisResult {
    /// Strike-ordered curves and run metadata.
    pub report: SmileReport,
    /// Call side display curves.
    pub calls: SmileDisplay,
    /// Put side display curves.
    pub puts: SmileDisplay,
}

/// Runs smile analyses with a fixed configuration.
#[derive(Debug, Clone)]
pub struct SmileAnalysis {
    config: AnalysisConfig,
    builder: VolatilitySurfaceBuilder,
    smoother: CurveSmoother,
}

impl SmileAnalysis {
    /// Creates an analysis after validating the configuration.
    pub fn new(config: AnalysisConfig) -> Result<Self, SmileError> {
        config.validate()?;

        let builder = VolatilitySurfaceBuilder::new(config.solver.clone(), config.band);
        let smoother = CurveSmoother::new(config.smoother);

        Ok(Self {
            config,
            builder,
            smoother,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Pricing parameters for a snapshot taken on `as_of`.
    ///
    /// Fails with [`SmileError::ExpiredContract`] when the configured expiry
    /// is not after `as_of`.
    #[must_use = "an expired contract is reported through the result"]
    pub fn pricing_parameters(&self, as_of: NaiveDate) -> Result<PricingParameters, SmileError> {
        PricingParameters::derive(
            as_of,
            self.config.expiry,
            self.config.risk_free_rate,
            self.config.day_count_basis,
        )
    }

    /// Analyses one chain.
    ///
    /// An expired contract aborts before any quote is processed. Quotes that
    /// cannot be inverted are dropped from their curve and counted in its
    /// rejection summary.
    pub fn run(
        &self,
        snapshot: &MarketSnapshot,
        calls: &[OptionQuote],
        puts: &[OptionQuote],
    ) -> Result<SmileAnalysisResult, SmileError> {
        let pricing = self.pricing_parameters(snapshot.as_of())?;
        info!(
            "analysing smile: spot {:.2} on {}, expiry {}, T = {:.4} years, r = {}",
            snapshot.spot(),
            snapshot.as_of(),
            self.config.expiry,
            pricing.time_to_expiry(),
            pricing.risk_free_rate()
        );

        let call_curve = self
            .builder
            .build(calls, snapshot.spot(), &pricing, OptionType::Call);
        let put_curve = self
            .builder
            .build(puts, snapshot.spot(), &pricing, OptionType::Put);

        let call_display = SmileDisplay {
            computed: self.smoother.smooth(&call_curve),
            reference: self.smoother.smooth_reference(&call_curve),
        };
        let put_display = SmileDisplay {
            computed: self.smoother.smooth(&put_curve),
            reference: self.smoother.smooth_reference(&put_curve),
        };

        let report = SmileReport {
            spot: snapshot.spot(),
            as_of: snapshot.as_of(),
            expiry: self.config.expiry,
            pricing,
            calls: call_curve,
            puts: put_curve,
            generated_at: current_time_millis(),
        };
        info!(
            "smile analysis done: {} call points, {} put points",
            report.calls.len(),
            report.puts.len()
        );

        Ok(SmileAnalysisResult {
            report,
            calls: call_display,
            puts: put_display,
        })
    }
}
