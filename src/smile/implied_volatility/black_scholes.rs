//! Black-Scholes pricing model.
//!
//! This module provides the closed-form Black-Scholes price of a European
//! option, which the solver inverts to recover implied volatility.

use super::types::{IVParams, OptionType};
use statrs::function::erf::erfc;

/// Square root of 2, precomputed for efficiency.
const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// Black-Scholes pricing model implementation.
///
/// Provides the Black-Scholes-Merton price without dividends.
pub struct BlackScholes;

impl BlackScholes {
    /// Standard normal cumulative distribution function (CDF).
    ///
    /// Calculates P(Z ≤ x) where Z is a standard normal random variable.
    /// Evaluated as `erfc(-x/√2) / 2`, which keeps full relative precision
    /// in the lower tail where deep out-of-the-money prices live.
    ///
    /// # Arguments
    /// - `x`: Input value
    ///
    /// # Returns
    /// Probability that a standard normal variable is less than or equal to x
    #[must_use]
    pub fn norm_cdf(x: f64) -> f64 {
        0.5 * erfc(-x / SQRT_2)
    }

    /// Calculates the d1 parameter of the Black-Scholes formula.
    ///
    /// d1 = [ln(S/K) + (r + σ²/2)T] / (σ√T)
    ///
    /// # Arguments
    /// - `spot`: Current underlying price (S)
    /// - `strike`: Option strike price (K)
    /// - `rate`: Risk-free interest rate (r)
    /// - `time`: Time to expiration in years (T)
    /// - `vol`: Volatility (σ)
    #[must_use]
    pub fn d1(spot: f64, strike: f64, rate: f64, time: f64, vol: f64) -> f64 {
        let sqrt_time = time.sqrt();
        ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * sqrt_time)
    }

    /// Calculates the d2 parameter of the Black-Scholes formula.
    ///
    /// d2 = d1 - σ√T
    #[must_use]
    pub fn d2(d1: f64, vol: f64, time: f64) -> f64 {
        d1 - vol * time.sqrt()
    }

    /// Calculates the theoretical option price using Black-Scholes formula.
    ///
    /// For calls: C = S·N(d1) - K·e^(-rT)·N(d2)
    /// For puts:  P = K·e^(-rT)·N(-d2) - S·N(-d1)
    ///
    /// # Arguments
    /// - `params`: Option parameters (spot, strike, time, rate, type)
    /// - `vol`: Volatility (σ)
    ///
    /// # Returns
    /// Theoretical option price, never negative
    #[must_use]
    pub fn price(params: &IVParams, vol: f64) -> f64 {
        if params.time_to_expiry <= 0.0 {
            return params.intrinsic_value();
        }

        if vol <= 0.0 {
            // Zero volatility collapses the option onto its discounted payoff
            return params.price_bounds().0;
        }

        let d1 = Self::d1(
            params.spot,
            params.strike,
            params.risk_free_rate,
            params.time_to_expiry,
            vol,
        );
        let d2 = Self::d2(d1, vol, params.time_to_expiry);
        let discount = params.discount_factor();

        let price = match params.option_type {
            OptionType::Call => {
                params.spot * Self::norm_cdf(d1) - params.strike * discount * Self::norm_cdf(d2)
            }
            OptionType::Put => {
                params.strike * discount * Self::norm_cdf(-d2) - params.spot * Self::norm_cdf(-d1)
            }
        };

        price.max(0.0)
    }
}
