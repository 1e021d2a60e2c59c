//! Error types for implied volatility calculation.

use std::fmt;

/// Reasons a single quote could not be inverted into an implied volatility.
///
/// These are per-quote outcomes: the surface builder records and drops the
/// affected quote and carries on with the rest of the batch.
#[derive(Debug, Clone, PartialEq)]
pub enum IVError {
    /// The market price lies outside the price range spanned by the
    /// volatility bracket, so no root can be bracketed.
    RootNotBracketed {
        /// Market price observed.
        market_price: f64,
        /// Model price at the lower volatility bound.
        min_price: f64,
        /// Model price at the upper volatility bound.
        max_price: f64,
    },

    /// The solver did not converge within max iterations.
    NonConvergence {
        /// Number of iterations attempted.
        iterations: u32,
        /// Last IV estimate before giving up.
        last_iv: f64,
    },

    /// Invalid input parameters for IV calculation.
    InvalidParams {
        /// Description of the invalid parameter.
        message: String,
    },
}

impl fmt::Display for IVError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IVError::RootNotBracketed {
                market_price,
                min_price,
                max_price,
            } => {
                write!(
                    f,
                    "root not bracketed: market price {market_price:.4} outside model range [{min_price:.4}, {max_price:.4}]"
                )
            }
            IVError::NonConvergence {
                iterations,
                last_iv,
            } => {
                write!(
                    f,
                    "solver did not converge after {iterations} iterations, last IV: {last_iv:.4}"
                )
            }
            IVError::InvalidParams { message } => {
                write!(f, "invalid parameters: {message}")
            }
        }
    }
}

impl std::error::Error for IVError {}
