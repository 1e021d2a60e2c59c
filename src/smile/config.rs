//! Configuration of a smile analysis run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::builder::AdmissibleBand;
use super::error::SmileError;
use super::implied_volatility::SolverConfig;
use super::smoother::SmootherConfig;

fn default_risk_free_rate() -> f64 {
    0.01
}

fn default_day_count_basis() -> f64 {
    365.0
}

/// Settings shared by every step of an analysis.
///
/// Only `expiry` is required when loading from JSON; everything else falls
/// back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Expiry date of the option chain being analysed.
    pub expiry: NaiveDate,
    /// Annualized risk-free rate (default: 0.01).
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Days per year used for the time to expiry (default: 365).
    #[serde(default = "default_day_count_basis")]
    pub day_count_basis: f64,
    /// Root finder settings, including the volatility bracket.
    #[serde(default)]
    pub solver: SolverConfig,
    /// Volatilities accepted into a curve.
    #[serde(default)]
    pub band: AdmissibleBand,
    /// Dense curve settings.
    #[serde(default)]
    pub smoother: SmootherConfig,
}

impl AnalysisConfig {
    /// Creates a configuration for the given expiry with default settings.
    #[must_use]
    pub fn new(expiry: NaiveDate) -> Self {
        Self {
            expiry,
            risk_free_rate: default_risk_free_rate(),
            day_count_basis: default_day_count_basis(),
            solver: SolverConfig::default(),
            band: AdmissibleBand::default(),
            smoother: SmootherConfig::default(),
        }
    }

    /// Sets the risk-free rate.
    #[must_use]
    pub fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }

    /// Sets the day count basis.
    #[must_use]
    pub fn with_day_count_basis(mut self, day_count_basis: f64) -> Self {
        self.day_count_basis = day_count_basis;
        self
    }

    /// Sets the solver configuration.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the admissible band.
    #[must_use]
    pub fn with_band(mut self, band: AdmissibleBand) -> Self {
        self.band = band;
        self
    }

    /// Sets the smoother configuration.
    #[must_use]
    pub fn with_smoother(mut self, smoother: SmootherConfig) -> Self {
        self.smoother = smoother;
        self
    }

    /// Parses and validates a configuration from JSON.
    pub fn from_json(data: &str) -> Result<Self, SmileError> {
        let config: Self =
            serde_json::from_str(data).map_err(|error| SmileError::DeserializationError {
                message: error.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every setting for consistency.
    pub fn validate(&self) -> Result<(), SmileError> {
        let invalid = |message: String| Err(SmileError::InvalidConfig { message });

        if !self.risk_free_rate.is_finite() {
            return invalid(format!(
                "risk-free rate must be finite, got {}",
                self.risk_free_rate
            ));
        }
        if !(self.day_count_basis > 0.0 && self.day_count_basis.is_finite()) {
            return invalid(format!(
                "day count basis must be positive, got {}",
                self.day_count_basis
            ));
        }
        if !(self.solver.min_iv > 0.0
            && self.solver.min_iv < self.solver.max_iv
            && self.solver.max_iv.is_finite())
        {
            return invalid(format!(
                "solver bracket must be finite with 0 < min < max, got [{}, {}]",
                self.solver.min_iv, self.solver.max_iv
            ));
        }
        if self.solver.max_iterations == 0 {
            return invalid("solver needs at least one iteration".to_string());
        }
        if !(self.solver.tolerance > 0.0 && self.solver.relative_tolerance >= 0.0) {
            return invalid(format!(
                "solver tolerances must be positive, got {} / {}",
                self.solver.tolerance, self.solver.relative_tolerance
            ));
        }
        if !(self.band.lower >= 0.0
            && self.band.lower < self.band.upper
            && self.band.upper.is_finite())
        {
            return invalid(format!(
                "admissible band must be finite with 0 <= lower < upper, got ({}, {})",
                self.band.lower, self.band.upper
            ));
        }
        if self.smoother.samples < 2 {
            return invalid(format!(
                "dense curves need at least 2 samples, got {}",
                self.smoother.samples
            ));
        }
        if self.smoother.min_points < 2 {
            return invalid(format!(
                "smoothing threshold must be at least 2 points, got {}",
                self.smoother.min_points
            ));
        }

        Ok(())
    }
}
