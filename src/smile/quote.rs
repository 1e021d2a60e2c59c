//! Market inputs for a smile analysis: option quotes, the spot snapshot and
//! the pricing parameters derived from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, trace};

use super::error::SmileError;

/// A single option quote as supplied by the market data collaborator.
///
/// Field names follow the upstream option-chain columns (`strike`,
/// `lastPrice`, `impliedVolatility`, `volume`). Deserialization runs the
/// same validation as [`OptionQuote::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOptionQuote", rename_all = "camelCase")]
pub struct OptionQuote {
    strike: f64,
    last_price: f64,
    /// Implied volatility published by the data source, for comparison only.
    #[serde(rename = "impliedVolatility")]
    reference_iv: Option<f64>,
    volume: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOptionQuote {
    strike: f64,
    last_price: f64,
    #[serde(default, rename = "impliedVolatility")]
    reference_iv: Option<f64>,
    #[serde(default)]
    volume: Option<u64>,
}

impl TryFrom<RawOptionQuote> for OptionQuote {
    type Error = SmileError;

    fn try_from(raw: RawOptionQuote) -> Result<Self, Self::Error> {
        let quote = OptionQuote::new(raw.strike, raw.last_price)?;
        let quote = match raw.reference_iv {
            Some(iv) => quote.with_reference_iv(iv)?,
            None => quote,
        };
        Ok(match raw.volume {
            Some(volume) => quote.with_volume(volume),
            None => quote,
        })
    }
}

impl OptionQuote {
    /// Creates a quote from its strike and last traded price.
    ///
    /// # Errors
    /// [`SmileError::InvalidQuote`] unless `strike > 0` and `last_price >= 0`,
    /// both finite.
    pub fn new(strike: f64, last_price: f64) -> Result<Self, SmileError> {
        if !(strike > 0.0 && strike.is_finite()) {
            return Err(SmileError::InvalidQuote {
                message: format!("strike must be positive, got {strike}"),
            });
        }
        if !(last_price >= 0.0 && last_price.is_finite()) {
            return Err(SmileError::InvalidQuote {
                message: format!("last price must be non-negative, got {last_price}"),
            });
        }

        Ok(Self {
            strike,
            last_price,
            reference_iv: None,
            volume: None,
        })
    }

    /// Attaches the externally published implied volatility.
    ///
    /// # Errors
    /// [`SmileError::InvalidQuote`] if `iv` is negative or not finite.
    pub fn with_reference_iv(mut self, iv: f64) -> Result<Self, SmileError> {
        if !(iv >= 0.0 && iv.is_finite()) {
            return Err(SmileError::InvalidQuote {
                message: format!("reference implied volatility must be non-negative, got {iv}"),
            });
        }
        self.reference_iv = Some(iv);
        Ok(self)
    }

    /// Attaches the traded volume.
    #[must_use]
    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Option strike price.
    #[must_use]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Last traded price.
    #[must_use]
    pub fn last_price(&self) -> f64 {
        self.last_price
    }

    /// Implied volatility published by the data source, if any.
    #[must_use]
    pub fn reference_iv(&self) -> Option<f64> {
        self.reference_iv
    }

    /// Traded volume, if known.
    #[must_use]
    pub fn volume(&self) -> Option<u64> {
        self.volume
    }
}

/// Spot price of the underlying and the date it was observed.
///
/// Deserialization runs the same validation as [`MarketSnapshot::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMarketSnapshot")]
pub struct MarketSnapshot {
    spot: f64,
    as_of: NaiveDate,
}

#[derive(Deserialize)]
struct RawMarketSnapshot {
    spot: f64,
    as_of: NaiveDate,
}

impl TryFrom<RawMarketSnapshot> for MarketSnapshot {
    type Error = SmileError;

    fn try_from(raw: RawMarketSnapshot) -> Result<Self, Self::Error> {
        MarketSnapshot::new(raw.spot, raw.as_of)
    }
}

impl MarketSnapshot {
    /// Creates a snapshot.
    ///
    /// # Errors
    /// [`SmileError::InvalidSnapshot`] unless `spot` is positive and finite.
    pub fn new(spot: f64, as_of: NaiveDate) -> Result<Self, SmileError> {
        if !(spot > 0.0 && spot.is_finite()) {
            return Err(SmileError::InvalidSnapshot {
                message: format!("spot price must be positive, got {spot}"),
            });
        }
        Ok(Self { spot, as_of })
    }

    /// Underlying spot price.
    #[must_use]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Observation date.
    #[must_use]
    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }
}

/// Rate and maturity shared by every quote of a run.
///
/// `time_to_expiry` is always positive, including after deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPricingParameters")]
pub struct PricingParameters {
    risk_free_rate: f64,
    time_to_expiry: f64,
}

#[derive(Deserialize)]
struct RawPricingParameters {
    risk_free_rate: f64,
    time_to_expiry: f64,
}

impl TryFrom<RawPricingParameters> for PricingParameters {
    type Error = SmileError;

    fn try_from(raw: RawPricingParameters) -> Result<Self, Self::Error> {
        PricingParameters::new(raw.risk_free_rate, raw.time_to_expiry)
    }
}

impl PricingParameters {
    /// Creates pricing parameters from an explicit year fraction.
    ///
    /// # Errors
    /// [`SmileError::InvalidConfig`] if the rate is not finite or the time to
    /// expiry is not a positive finite number.
    pub fn new(risk_free_rate: f64, time_to_expiry: f64) -> Result<Self, SmileError> {
        if !risk_free_rate.is_finite() {
            return Err(SmileError::InvalidConfig {
                message: format!("risk-free rate must be finite, got {risk_free_rate}"),
            });
        }
        if !(time_to_expiry > 0.0 && time_to_expiry.is_finite()) {
            return Err(SmileError::InvalidConfig {
                message: format!("time to expiry must be positive, got {time_to_expiry}"),
            });
        }
        Ok(Self {
            risk_free_rate,
            time_to_expiry,
        })
    }

    /// Derives the parameters from the snapshot date and a target expiry.
    ///
    /// Time to expiry is `(expiry - as_of)` in whole days over
    /// `day_count_basis`.
    ///
    /// # Errors
    /// [`SmileError::ExpiredContract`] when the expiry is not strictly after
    /// `as_of`; [`SmileError::InvalidConfig`] for a bad rate or basis.
    pub fn derive(
        as_of: NaiveDate,
        expiry: NaiveDate,
        risk_free_rate: f64,
        day_count_basis: f64,
    ) -> Result<Self, SmileError> {
        if !(day_count_basis > 0.0 && day_count_basis.is_finite()) {
            return Err(SmileError::InvalidConfig {
                message: format!("day count basis must be positive, got {day_count_basis}"),
            });
        }

        let days = (expiry - as_of).num_days();
        let time_to_expiry = days as f64 / day_count_basis;
        trace!(
            "time to expiry from {} to {}: {} days, {:.6} years",
            as_of, expiry, days, time_to_expiry
        );

        if time_to_expiry <= 0.0 {
            error!("option expired: expiry {} is not after {}", expiry, as_of);
            return Err(SmileError::ExpiredContract {
                as_of,
                expiry,
                time_to_expiry,
            });
        }

        Self::new(risk_free_rate, time_to_expiry)
    }

    /// Annualized risk-free rate.
    #[must_use]
    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Time to expiry in years, always positive.
    #[must_use]
    pub fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }
}
