//! Construction of strike-ordered implied volatility curves from quotes.
//!
//! The builder inverts every quote of one option side, drops the points the
//! solver could not produce or that fall outside a plausibility band, and
//! returns the survivors sorted by strike.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::implied_volatility::{
    IVError, IVParams, IVSolution, OptionType, SolverConfig, solve_iv,
};
use super::error::SmileError;
use super::quote::{OptionQuote, PricingParameters};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Open interval of implied volatilities accepted into a curve.
///
/// Both ends are excluded: a volatility equal to `lower` or `upper` is
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissibleBand {
    /// Exclusive lower bound (default: 0.01).
    pub lower: f64,
    /// Exclusive upper bound (default: 2.0).
    pub upper: f64,
}

impl Default for AdmissibleBand {
    fn default() -> Self {
        Self {
            lower: 0.01,
            upper: 2.0,
        }
    }
}

impl AdmissibleBand {
    /// Creates a band with the given exclusive bounds.
    #[must_use]
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Returns true if `vol` lies strictly inside the band.
    #[must_use]
    pub fn contains(&self, vol: f64) -> bool {
        vol > self.lower && vol < self.upper
    }
}

/// Solver outcome for one quote, before filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedPoint {
    /// Option strike price.
    pub strike: f64,
    /// Price the solver tried to match.
    pub last_price: f64,
    /// Externally published implied volatility, if any.
    pub reference_iv: Option<f64>,
    /// Solved volatility, or the reason it is missing.
    pub outcome: Result<IVSolution, IVError>,
}

impl ComputedPoint {
    /// Implied volatility, `None` when the inversion failed.
    #[must_use]
    pub fn implied_vol(&self) -> Option<f64> {
        self.outcome.as_ref().ok().map(|solution| solution.iv)
    }
}

/// An admissible point of a [`Curve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Option strike price.
    pub strike: f64,
    /// Implied volatility, strictly inside the admissible band.
    pub implied_vol: f64,
    /// Last traded price used for the inversion.
    pub last_price: f64,
    /// Externally published implied volatility, if any.
    pub reference_iv: Option<f64>,
}

/// Number of quotes dropped while building a curve, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionSummary {
    /// Market price outside the range reachable within the solver bracket.
    pub not_bracketed: usize,
    /// Solver ran out of iterations.
    pub non_convergent: usize,
    /// Inputs the solver refused.
    pub invalid: usize,
    /// Solved volatility outside the admissible band.
    pub out_of_band: usize,
    /// Strike already present in the curve.
    pub duplicate_strike: usize,
}

impl RejectionSummary {
    /// Total number of dropped quotes.
    #[must_use]
    pub fn total(&self) -> usize {
        self.not_bracketed
            + self.non_convergent
            + self.invalid
            + self.out_of_band
            + self.duplicate_strike
    }

    fn record_failure(&mut self, error: &IVError) {
        match error {
            IVError::RootNotBracketed { .. } => self.not_bracketed += 1,
            IVError::NonConvergence { .. } => self.non_convergent += 1,
            IVError::InvalidParams { .. } => self.invalid += 1,
        }
    }
}

/// Implied volatility curve for one option side.
///
/// Points are strictly increasing by strike and every volatility lies inside
/// the admissible band the curve was built with.
///
/// Deserialization re-checks both invariants against the stored band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCurve")]
pub struct Curve {
    option_type: OptionType,
    band: AdmissibleBand,
    points: Vec<CurvePoint>,
    rejections: RejectionSummary,
}

#[derive(Deserialize)]
struct RawCurve {
    option_type: OptionType,
    band: AdmissibleBand,
    points: Vec<CurvePoint>,
    rejections: RejectionSummary,
}

impl TryFrom<RawCurve> for Curve {
    type Error = SmileError;

    fn try_from(raw: RawCurve) -> Result<Self, Self::Error> {
        let invalid = |message: String| Err(SmileError::InvalidCurve { message });
        let band = raw.band;

        if !(band.lower >= 0.0 && band.lower < band.upper && band.upper.is_finite()) {
            return invalid(format!(
                "band must satisfy 0 <= lower < upper, got ({}, {})",
                band.lower, band.upper
            ));
        }
        for point in &raw.points {
            if !(point.strike > 0.0 && point.strike.is_finite()) {
                return invalid(format!("strike must be positive, got {}", point.strike));
            }
            if !band.contains(point.implied_vol) {
                return invalid(format!(
                    "strike {}: IV {} outside ({}, {})",
                    point.strike, point.implied_vol, band.lower, band.upper
                ));
            }
            if point.reference_iv.is_some_and(|iv| !(iv >= 0.0 && iv.is_finite())) {
                return invalid(format!(
                    "strike {}: reference IV must be non-negative",
                    point.strike
                ));
            }
        }
        if let Some(pair) = raw.points.windows(2).find(|w| w[1].strike <= w[0].strike) {
            return invalid(format!(
                "strikes not strictly increasing: {} then {}",
                pair[0].strike, pair[1].strike
            ));
        }

        Ok(Curve {
            option_type: raw.option_type,
            band,
            points: raw.points,
            rejections: raw.rejections,
        })
    }
}

impl Curve {
    /// Option side of the curve.
    #[must_use]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Band every point's volatility lies in.
    #[must_use]
    pub fn band(&self) -> &AdmissibleBand {
        &self.band
    }

    /// Admissible points, ascending by strike.
    #[must_use]
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Quotes dropped while building the curve.
    #[must_use]
    pub fn rejections(&self) -> &RejectionSummary {
        &self.rejections
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if no quote survived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(strike, implied_vol)` pairs.
    #[must_use]
    pub fn implied_vol_points(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|point| (point.strike, point.implied_vol))
            .collect()
    }

    /// `(strike, reference_iv)` pairs for the points carrying a reference
    /// volatility.
    #[must_use]
    pub fn reference_points(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|point| point.reference_iv.map(|iv| (point.strike, iv)))
            .collect()
    }

    /// Highest computed or reference volatility on the curve.
    #[must_use]
    pub fn max_vol(&self) -> Option<f64> {
        self.points
            .iter()
            .flat_map(|point| std::iter::once(point.implied_vol).chain(point.reference_iv))
            .reduce(f64::max)
    }
}

/// Builds implied volatility curves from option quotes.
#[derive(Debug, Clone, Default)]
pub struct VolatilitySurfaceBuilder {
    solver: SolverConfig,
    band: AdmissibleBand,
}

impl VolatilitySurfaceBuilder {
    /// Creates a builder with the given solver settings and band.
    #[must_use]
    pub fn new(solver: SolverConfig, band: AdmissibleBand) -> Self {
        Self { solver, band }
    }

    /// Solver settings in use.
    #[must_use]
    pub fn solver(&self) -> &SolverConfig {
        &self.solver
    }

    /// Admissible band in use.
    #[must_use]
    pub fn band(&self) -> &AdmissibleBand {
        &self.band
    }

    /// Inverts every quote, keeping input order and failed points.
    #[must_use]
    pub fn compute_points(
        &self,
        quotes: &[OptionQuote],
        spot: f64,
        pricing: &PricingParameters,
        option_type: OptionType,
    ) -> Vec<ComputedPoint> {
        let compute = |quote: &OptionQuote| {
            let params = IVParams::new(
                spot,
                quote.strike(),
                pricing.time_to_expiry(),
                pricing.risk_free_rate(),
                option_type,
            );
            ComputedPoint {
                strike: quote.strike(),
                last_price: quote.last_price(),
                reference_iv: quote.reference_iv(),
                outcome: solve_iv(&params, quote.last_price(), &self.solver),
            }
        };

        #[cfg(feature = "parallel")]
        let points = quotes.par_iter().map(compute).collect();
        #[cfg(not(feature = "parallel"))]
        let points = quotes.iter().map(compute).collect();

        points
    }

    /// Builds the curve for one option side.
    ///
    /// Failed inversions and out-of-band volatilities are dropped, the rest
    /// is sorted by strike. When two quotes share a strike the first one in
    /// input order is kept.
    #[must_use]
    pub fn build(
        &self,
        quotes: &[OptionQuote],
        spot: f64,
        pricing: &PricingParameters,
        option_type: OptionType,
    ) -> Curve {
        let side = option_type.as_str();
        let mut rejections = RejectionSummary::default();
        let mut points = Vec::with_capacity(quotes.len());

        for computed in self.compute_points(quotes, spot, pricing, option_type) {
            let solution = match &computed.outcome {
                Ok(solution) => solution,
                Err(error) => {
                    debug!(
                        "{} strike {}: dropped, {}",
                        side, computed.strike, error
                    );
                    rejections.record_failure(error);
                    continue;
                }
            };

            if !self.band.contains(solution.iv) {
                debug!(
                    "{} strike {}: dropped, IV {:.4} outside ({}, {})",
                    side, computed.strike, solution.iv, self.band.lower, self.band.upper
                );
                rejections.out_of_band += 1;
                continue;
            }

            points.push(CurvePoint {
                strike: computed.strike,
                implied_vol: solution.iv,
                last_price: computed.last_price,
                reference_iv: computed.reference_iv,
            });
        }

        // Stable: among equal strikes the input order survives
        points.sort_by(|a, b| a.strike.total_cmp(&b.strike));
        let before = points.len();
        points.dedup_by(|later, earlier| later.strike == earlier.strike);
        let duplicates = before - points.len();
        if duplicates > 0 {
            warn!(
                "{} curve: collapsed {} quotes with duplicate strikes",
                side, duplicates
            );
            rejections.duplicate_strike = duplicates;
        }

        info!(
            "{} curve: {} of {} quotes kept ({} not bracketed, {} non-convergent, {} invalid, {} out of band)",
            side,
            points.len(),
            quotes.len(),
            rejections.not_bracketed,
            rejections.non_convergent,
            rejections.invalid,
            rejections.out_of_band
        );
        if points.is_empty() && !quotes.is_empty() {
            warn!("{} curve: no admissible points", side);
        }

        Curve {
            option_type,
            band: self.band,
            points,
            rejections,
        }
    }
}
