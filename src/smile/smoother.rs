//! Dense rendering of sparse implied volatility curves.
//!
//! An interpolating spline of degree `min(3, n - 1)` is fit through the
//! curve points and sampled on an even strike grid. Cubic splines use
//! not-a-knot end conditions: the third derivative is continuous at the
//! second and second-to-last knots, so the first two and the last two
//! intervals each share one polynomial. With exactly `degree + 1` points
//! the spline is the single interpolating polynomial.
//!
//! # Algorithm
//!
//! Second derivatives at the knots are solved from the standard continuity
//! equations, with the not-a-knot rows folded into the first and last
//! equations so the system stays tridiagonal. The Thomas algorithm solves
//! it in O(n). Evaluation uses binary search + Horner form.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::builder::Curve;
use crate::utils::linspace;

/// Smoother settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmootherConfig {
    /// Number of samples in a dense curve (default: 300).
    pub samples: usize,
    /// Minimum number of points for smoothing to be attempted (default: 4).
    pub min_points: usize,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            samples: 300,
            min_points: 4,
        }
    }
}

/// Evenly spaced `(strike, vol)` samples spanning a curve's strike range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseCurve {
    samples: Vec<(f64, f64)>,
}

impl DenseCurve {
    /// The `(strike, vol)` samples, ascending by strike.
    #[must_use]
    pub fn samples(&self) -> &[(f64, f64)] {
        &self.samples
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Display-ready rendering of a curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SmoothedCurve {
    /// Spline samples.
    Dense(DenseCurve),
    /// Too few points to smooth; draw them point to point.
    Passthrough(Vec<(f64, f64)>),
}

impl SmoothedCurve {
    /// The points to draw, whichever variant this is.
    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        match self {
            SmoothedCurve::Dense(dense) => dense.samples(),
            SmoothedCurve::Passthrough(points) => points,
        }
    }

    /// Returns true if the curve was smoothed.
    #[must_use]
    pub fn is_dense(&self) -> bool {
        matches!(self, SmoothedCurve::Dense(_))
    }
}

/// Polynomial piece on `[x_i, x_{i+1}]`:
/// `S(x) = a + b·(x - x_i) + c·(x - x_i)² + d·(x - x_i)³`
#[derive(Debug, Clone, Copy, PartialEq)]
struct SplineCoeff {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

/// Interpolating spline through strictly increasing knots.
#[derive(Debug, Clone)]
struct InterpolatingSpline {
    /// Left end of each piece, followed by the right end of the last one.
    breaks: Vec<f64>,
    coeffs: Vec<SplineCoeff>,
}

impl InterpolatingSpline {
    /// Fits the spline of degree `min(3, n - 1)` through `(x, y)`.
    ///
    /// `x` must be strictly increasing with at least two points.
    fn fit(x: &[f64], y: &[f64]) -> Self {
        let n = x.len();
        match n.saturating_sub(1).min(3) {
            1 => Self::linear(x, y),
            2 => Self::quadratic(x, y),
            _ if n == 4 => Self::cubic_polynomial(x, y),
            _ => Self::not_a_knot_cubic(x, y),
        }
    }

    fn linear(x: &[f64], y: &[f64]) -> Self {
        let slope = (y[1] - y[0]) / (x[1] - x[0]);
        Self {
            breaks: vec![x[0], x[1]],
            coeffs: vec![SplineCoeff {
                a: y[0],
                b: slope,
                c: 0.0,
                d: 0.0,
            }],
        }
    }

    /// Parabola through three points, expanded around `x[0]`.
    fn quadratic(x: &[f64], y: &[f64]) -> Self {
        let f01 = (y[1] - y[0]) / (x[1] - x[0]);
        let f12 = (y[2] - y[1]) / (x[2] - x[1]);
        let f012 = (f12 - f01) / (x[2] - x[0]);
        Self {
            breaks: vec![x[0], x[2]],
            coeffs: vec![SplineCoeff {
                a: y[0],
                b: f01 + f012 * (x[0] - x[1]),
                c: f012,
                d: 0.0,
            }],
        }
    }

    /// Cubic through four points, expanded around `x[0]`.
    ///
    /// Not-a-knot at both interior knots leaves a single polynomial.
    fn cubic_polynomial(x: &[f64], y: &[f64]) -> Self {
        // Newton divided differences
        let f01 = (y[1] - y[0]) / (x[1] - x[0]);
        let f12 = (y[2] - y[1]) / (x[2] - x[1]);
        let f23 = (y[3] - y[2]) / (x[3] - x[2]);
        let f012 = (f12 - f01) / (x[2] - x[0]);
        let f123 = (f23 - f12) / (x[3] - x[1]);
        let f0123 = (f123 - f012) / (x[3] - x[0]);

        // Expand f01·(u) + f012·u(u - h1) + f0123·u(u - h1)(u - h2) with u = x - x0
        let h1 = x[1] - x[0];
        let h2 = x[2] - x[0];
        Self {
            breaks: vec![x[0], x[3]],
            coeffs: vec![SplineCoeff {
                a: y[0],
                b: f01 - f012 * h1 + f0123 * h1 * h2,
                c: f012 - f0123 * (h1 + h2),
                d: f0123,
            }],
        }
    }

    /// Not-a-knot cubic spline for five or more points.
    fn not_a_knot_cubic(x: &[f64], y: &[f64]) -> Self {
        let n = x.len();
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let slopes: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();

        // Unknowns are the interior second derivatives m[1..n-1]
        let m_len = n - 2;
        let mut sub = vec![0.0; m_len];
        let mut diag = vec![0.0; m_len];
        let mut sup = vec![0.0; m_len];
        let mut rhs = vec![0.0; m_len];

        for j in 0..m_len {
            let i = j + 1;
            sub[j] = h[i - 1];
            diag[j] = 2.0 * (h[i - 1] + h[i]);
            sup[j] = h[i];
            rhs[j] = 6.0 * (slopes[i] - slopes[i - 1]);
        }

        // m[0] = ((h0 + h1)·m[1] - h0·m[2]) / h1
        diag[0] += h[0] * (h[0] + h[1]) / h[1];
        sup[0] -= h[0] * h[0] / h[1];
        sub[0] = 0.0;

        // m[n-1] = ((h[n-3] + h[n-2])·m[n-2] - h[n-2]·m[n-3]) / h[n-3]
        let (ha, hb) = (h[n - 3], h[n - 2]);
        diag[m_len - 1] += hb * (ha + hb) / ha;
        sub[m_len - 1] -= hb * hb / ha;
        sup[m_len - 1] = 0.0;

        // Thomas algorithm: forward sweep
        for j in 1..m_len {
            let w = sub[j] / diag[j - 1];
            diag[j] -= w * sup[j - 1];
            rhs[j] -= w * rhs[j - 1];
        }

        // Back substitution
        let mut m = vec![0.0; n];
        m[m_len] = rhs[m_len - 1] / diag[m_len - 1];
        for j in (0..m_len - 1).rev() {
            m[j + 1] = (rhs[j] - sup[j] * m[j + 2]) / diag[j];
        }
        m[0] = ((h[0] + h[1]) * m[1] - h[0] * m[2]) / h[1];
        m[n - 1] = ((ha + hb) * m[n - 2] - hb * m[n - 3]) / ha;
        trace!("not-a-knot second derivatives: {:?}", m);

        let coeffs = (0..n - 1)
            .map(|i| SplineCoeff {
                a: y[i],
                b: slopes[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0,
                c: m[i] / 2.0,
                d: (m[i + 1] - m[i]) / (6.0 * h[i]),
            })
            .collect();

        Self {
            breaks: x.to_vec(),
            coeffs,
        }
    }

    /// Evaluates the spline inside the knot range.
    fn eval(&self, x: f64) -> f64 {
        let last = self.coeffs.len() - 1;
        let i = self
            .breaks
            .partition_point(|&knot| knot <= x)
            .saturating_sub(1)
            .min(last);
        let dx = x - self.breaks[i];
        let c = &self.coeffs[i];
        // Horner form: a + dx*(b + dx*(c + dx*d))
        c.a + dx * (c.b + dx * (c.c + dx * c.d))
    }
}

/// Turns sparse curves into dense, evenly sampled sequences for plotting.
#[derive(Debug, Clone, Default)]
pub struct CurveSmoother {
    config: SmootherConfig,
}

impl CurveSmoother {
    /// Creates a smoother with the given settings.
    #[must_use]
    pub fn new(config: SmootherConfig) -> Self {
        Self { config }
    }

    /// Smoother settings in use.
    #[must_use]
    pub fn config(&self) -> &SmootherConfig {
        &self.config
    }

    /// Smooths the computed implied volatilities of a curve.
    #[must_use]
    pub fn smooth(&self, curve: &Curve) -> SmoothedCurve {
        self.smooth_sorted(curve.implied_vol_points())
    }

    /// Smooths the reference implied volatilities of a curve, skipping
    /// points without one.
    #[must_use]
    pub fn smooth_reference(&self, curve: &Curve) -> SmoothedCurve {
        self.smooth_sorted(curve.reference_points())
    }

    /// Smooths points already strictly increasing in strike.
    fn smooth_sorted(&self, points: Vec<(f64, f64)>) -> SmoothedCurve {
        if points.len() < self.config.min_points.max(2) {
            debug!(
                "{} points, below smoothing threshold {}, passing through",
                points.len(),
                self.config.min_points
            );
            return SmoothedCurve::Passthrough(points);
        }

        let (x, y): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
        let spline = InterpolatingSpline::fit(&x, &y);

        let samples = linspace(x[0], x[x.len() - 1], self.config.samples)
            .into_iter()
            .map(|strike| (strike, spline.eval(strike)))
            .collect();

        SmoothedCurve::Dense(DenseCurve { samples })
    }
}
