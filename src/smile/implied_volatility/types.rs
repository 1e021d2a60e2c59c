//! Types for implied volatility calculation.

use serde::{Deserialize, Serialize};

/// Option side for pricing and IV calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Call option (right to buy the underlying at strike price).
    Call,
    /// Put option (right to sell the underlying at strike price).
    Put,
}

impl OptionType {
    /// Lowercase label used in log lines and reports.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

/// Parameters for a single IV calculation.
///
/// These parameters define the option contract and market conditions
/// needed to price it or invert its price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IVParams {
    /// Underlying spot price in price units.
    pub spot: f64,
    /// Option strike price in price units.
    pub strike: f64,
    /// Time to expiration in years (e.g., 30 days = 30.0 / 365.0).
    pub time_to_expiry: f64,
    /// Risk-free interest rate (annualized, e.g., 0.05 for 5%).
    pub risk_free_rate: f64,
    /// Option type (Call or Put).
    pub option_type: OptionType,
}

impl IVParams {
    /// Creates new IV parameters.
    ///
    /// # Arguments
    /// - `spot`: Underlying spot price in price units
    /// - `strike`: Option strike price in price units
    /// - `time_to_expiry`: Time to expiration in years
    /// - `risk_free_rate`: Risk-free interest rate (annualized)
    /// - `option_type`: Call or Put
    #[must_use]
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            option_type,
        }
    }

    /// Creates parameters for a call option.
    #[must_use]
    pub fn call(spot: f64, strike: f64, time_to_expiry: f64, risk_free_rate: f64) -> Self {
        Self::new(
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            OptionType::Call,
        )
    }

    /// Creates parameters for a put option.
    #[must_use]
    pub fn put(spot: f64, strike: f64, time_to_expiry: f64, risk_free_rate: f64) -> Self {
        Self::new(
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            OptionType::Put,
        )
    }

    /// Discount factor `e^(-rT)`.
    #[must_use]
    pub fn discount_factor(&self) -> f64 {
        (-self.risk_free_rate * self.time_to_expiry).exp()
    }

    /// Calculates the intrinsic value of the option.
    ///
    /// For calls: max(0, spot - strike)
    /// For puts: max(0, strike - spot)
    #[must_use]
    pub fn intrinsic_value(&self) -> f64 {
        match self.option_type {
            OptionType::Call => (self.spot - self.strike).max(0.0),
            OptionType::Put => (self.strike - self.spot).max(0.0),
        }
    }

    /// No-arbitrage price bounds `(lower, upper)` for a European option.
    ///
    /// For calls: `[max(0, S - K·e^(-rT)), S]`
    /// For puts:  `[max(0, K·e^(-rT) - S), K·e^(-rT)]`
    #[must_use]
    pub fn price_bounds(&self) -> (f64, f64) {
        let discounted_strike = self.strike * self.discount_factor();
        match self.option_type {
            OptionType::Call => ((self.spot - discounted_strike).max(0.0), self.spot),
            OptionType::Put => ((discounted_strike - self.spot).max(0.0), discounted_strike),
        }
    }
}

/// A successful inversion of the pricing model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IVSolution {
    /// Implied volatility (e.g., 0.25 = 25%).
    pub iv: f64,
    /// Number of solver iterations used.
    pub iterations: u32,
    /// Model price minus market price at `iv`.
    pub residual: f64,
}

impl IVSolution {
    /// Creates a new IV solution.
    #[must_use]
    pub fn new(iv: f64, iterations: u32, residual: f64) -> Self {
        Self {
            iv,
            iterations,
            residual,
        }
    }

    /// Returns the IV as a percentage (e.g., 25.0 for 25%).
    #[must_use]
    pub fn iv_percent(&self) -> f64 {
        self.iv * 100.0
    }
}
