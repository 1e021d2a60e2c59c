//! Brent solver for implied volatility calculation.
//!
//! This module provides a bracketed numerical solver to find the implied
//! volatility that makes the Black-Scholes price equal to the observed
//! market price. Brent's method mixes inverse quadratic interpolation,
//! secant steps and bisection, so it keeps the guaranteed convergence of
//! bisection while converging superlinearly near the root.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::black_scholes::BlackScholes;
use super::error::IVError;
use super::types::{IVParams, IVSolution, OptionType};

/// Configuration for the Brent solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum iterations before giving up.
    pub max_iterations: u32,
    /// Absolute convergence tolerance on volatility.
    pub tolerance: f64,
    /// Relative convergence tolerance on volatility.
    pub relative_tolerance: f64,
    /// Lower end of the volatility bracket (default: 0.001 = 0.1%).
    pub min_iv: f64,
    /// Upper end of the volatility bracket (default: 2.0 = 200%).
    pub max_iv: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 2e-12,
            relative_tolerance: 4.0 * f64::EPSILON,
            min_iv: 0.001,
            max_iv: 2.0,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the absolute convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the volatility bracket.
    #[must_use]
    pub fn with_bounds(mut self, min_iv: f64, max_iv: f64) -> Self {
        self.min_iv = min_iv;
        self.max_iv = max_iv;
        self
    }
}

/// Validates input parameters for IV calculation.
fn validate_params(params: &IVParams, market_price: f64) -> Result<(), IVError> {
    if !(params.spot > 0.0 && params.spot.is_finite()) {
        return Err(IVError::InvalidParams {
            message: format!("spot price must be positive, got {}", params.spot),
        });
    }

    if !(params.strike > 0.0 && params.strike.is_finite()) {
        return Err(IVError::InvalidParams {
            message: format!("strike price must be positive, got {}", params.strike),
        });
    }

    if !(params.time_to_expiry > 0.0 && params.time_to_expiry.is_finite()) {
        return Err(IVError::InvalidParams {
            message: format!(
                "time to expiry must be positive, got {}",
                params.time_to_expiry
            ),
        });
    }

    if !params.risk_free_rate.is_finite() {
        return Err(IVError::InvalidParams {
            message: format!(
                "risk-free rate must be finite, got {}",
                params.risk_free_rate
            ),
        });
    }

    if !market_price.is_finite() {
        return Err(IVError::InvalidParams {
            message: format!("market price must be finite, got {market_price}"),
        });
    }

    Ok(())
}

/// Solves for implied volatility using Brent's method.
///
/// Searches the root of `f(σ) = BS(σ) - market_price` over
/// `[config.min_iv, config.max_iv]`. The pricing model is strictly
/// increasing in σ, so a sign change across the bracket means exactly one
/// root inside it.
///
/// # Arguments
/// - `params`: Option parameters (spot, strike, time, rate, type)
/// - `market_price`: Observed market price to match
/// - `config`: Solver configuration
///
/// # Returns
/// - `Ok(IVSolution)`: Converged IV, iterations used and final residual
/// - `Err(IVError::RootNotBracketed)`: market price outside the range the
///   bracket can produce (zero or negative prices always land here)
/// - `Err(IVError::NonConvergence)`: iteration budget exhausted
/// - `Err(IVError::InvalidParams)`: non-positive or non-finite inputs
///
/// # Example
/// ```ignore
/// use volsmile_rs::prelude::{IVParams, SolverConfig, solve_iv};
///
/// let params = IVParams::call(100.0, 100.0, 0.5, 0.01);
/// let solution = solve_iv(&params, 5.88, &SolverConfig::default())?;
/// println!("IV: {:.2}%", solution.iv_percent());
/// ```
pub fn solve_iv(
    params: &IVParams,
    market_price: f64,
    config: &SolverConfig,
) -> Result<IVSolution, IVError> {
    validate_params(params, market_price)?;

    if !(config.min_iv > 0.0 && config.min_iv < config.max_iv && config.max_iv.is_finite()) {
        return Err(IVError::InvalidParams {
            message: format!(
                "volatility bracket must be finite with 0 < min < max, got [{}, {}]",
                config.min_iv, config.max_iv
            ),
        });
    }

    let objective = |vol: f64| BlackScholes::price(params, vol) - market_price;

    let mut x_pre = config.min_iv;
    let mut x_cur = config.max_iv;
    let mut f_pre = objective(x_pre);
    let mut f_cur = objective(x_cur);

    // A zero price is unattainable for any positive volatility.
    if market_price <= 0.0 || f_pre * f_cur > 0.0 {
        return Err(IVError::RootNotBracketed {
            market_price,
            min_price: f_pre + market_price,
            max_price: f_cur + market_price,
        });
    }
    if f_pre == 0.0 {
        return Ok(IVSolution::new(x_pre, 0, 0.0));
    }
    if f_cur == 0.0 {
        return Ok(IVSolution::new(x_cur, 0, 0.0));
    }

    // x_blk is the contrapoint: f(x_blk) always has the opposite sign of f(x_cur)
    let mut x_blk = 0.0;
    let mut f_blk = 0.0;
    let mut s_pre = 0.0;
    let mut s_cur = 0.0;

    for iteration in 0..config.max_iterations {
        if f_pre != 0.0 && f_cur != 0.0 && (f_pre < 0.0) != (f_cur < 0.0) {
            x_blk = x_pre;
            f_blk = f_pre;
            s_pre = x_cur - x_pre;
            s_cur = s_pre;
        }
        if f_blk.abs() < f_cur.abs() {
            x_pre = x_cur;
            x_cur = x_blk;
            x_blk = x_pre;

            f_pre = f_cur;
            f_cur = f_blk;
            f_blk = f_pre;
        }

        let delta = (config.tolerance + config.relative_tolerance * x_cur.abs()) / 2.0;
        let s_bis = (x_blk - x_cur) / 2.0;
        if f_cur == 0.0 || s_bis.abs() < delta {
            trace!(
                "IV converged to {:.8} after {} iterations (residual {:.3e})",
                x_cur,
                iteration,
                f_cur
            );
            return Ok(IVSolution::new(x_cur, iteration, f_cur));
        }

        if s_pre.abs() > delta && f_cur.abs() < f_pre.abs() {
            let s_try = if x_pre == x_blk {
                // Secant
                -f_cur * (x_cur - x_pre) / (f_cur - f_pre)
            } else {
                // Inverse quadratic interpolation
                let d_pre = (f_pre - f_cur) / (x_pre - x_cur);
                let d_blk = (f_blk - f_cur) / (x_blk - x_cur);
                -f_cur * (f_blk * d_blk - f_pre * d_pre) / (d_blk * d_pre * (f_blk - f_pre))
            };

            if 2.0 * s_try.abs() < s_pre.abs().min(3.0 * s_bis.abs() - delta) {
                s_pre = s_cur;
                s_cur = s_try;
            } else {
                s_pre = s_bis;
                s_cur = s_bis;
            }
        } else {
            s_pre = s_bis;
            s_cur = s_bis;
        }

        x_pre = x_cur;
        f_pre = f_cur;
        if s_cur.abs() > delta {
            x_cur += s_cur;
        } else {
            x_cur += if s_bis > 0.0 { delta } else { -delta };
        }

        f_cur = objective(x_cur);
        trace!("iteration {}: vol {:.8}, residual {:.3e}", iteration, x_cur, f_cur);
    }

    Err(IVError::NonConvergence {
        iterations: config.max_iterations,
        last_iv: x_cur,
    })
}

/// Implied volatility with the default solver configuration.
///
/// Returns `None` when the price cannot be inverted inside the default
/// bracket `[0.001, 2.0]`, never panics.
#[must_use]
pub fn implied_volatility(
    market_price: f64,
    spot: f64,
    strike: f64,
    time_to_expiry: f64,
    risk_free_rate: f64,
    option_type: OptionType,
) -> Option<f64> {
    let params = IVParams::new(spot, strike, time_to_expiry, risk_free_rate, option_type);
    solve_iv(&params, market_price, &SolverConfig::default())
        .ok()
        .map(|solution| solution.iv)
}
