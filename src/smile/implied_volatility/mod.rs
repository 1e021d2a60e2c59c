//! Implied volatility calculation from observed option prices.
//!
//! This module provides the closed-form Black-Scholes price of a European
//! option and its numerical inversion: given an observed price, find the
//! volatility that reproduces it.
//!
//! # Overview
//!
//! Implied Volatility (IV) is the option's "price" translated into different units.
//! The price of an option in USD and the IV in % are the same information in different units.
//!
//! # Black-Scholes Inversion
//!
//! Since there's no analytical solution to invert Black-Scholes, we use
//! Brent's bracketed root finder over a fixed volatility interval. The price
//! is strictly increasing in volatility (vega is always positive), so a sign
//! change across the interval pins down exactly one root. Prices outside the
//! range the interval can produce are reported as [`IVError::RootNotBracketed`]
//! instead of being forced onto a boundary.
//!
//! # Example
//!
//! ```ignore
//! use volsmile_rs::prelude::{IVParams, SolverConfig, solve_iv};
//!
//! let params = IVParams::call(100.0, 100.0, 0.5, 0.01);
//! let solution = solve_iv(&params, 5.88, &SolverConfig::default())?;
//! println!("IV: {:.2}%", solution.iv * 100.0);
//! ```

mod black_scholes;
mod error;
mod solver;
mod types;

pub use black_scholes::BlackScholes;
pub use error::IVError;
pub use solver::{SolverConfig, implied_volatility, solve_iv};
pub use types::{IVParams, IVSolution, OptionType};
