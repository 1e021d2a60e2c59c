//! Run-level errors for smile analysis.

use chrono::NaiveDate;
use std::fmt;

/// Errors that abort a smile analysis or reject its inputs.
///
/// Per-quote inversion failures are not represented here; see
/// [`IVError`](crate::smile::implied_volatility::IVError).
#[derive(Debug, Clone, PartialEq)]
pub enum SmileError {
    /// The target expiry is on or before the snapshot date.
    ExpiredContract {
        /// Date of the market snapshot.
        as_of: NaiveDate,
        /// Target expiry date.
        expiry: NaiveDate,
        /// Derived time to expiry in years (non-positive).
        time_to_expiry: f64,
    },

    /// An option quote failed validation.
    InvalidQuote {
        /// Description of the invalid field.
        message: String,
    },

    /// The market snapshot failed validation.
    InvalidSnapshot {
        /// Description of the invalid field.
        message: String,
    },

    /// A deserialized curve breaks the strike order or band invariants.
    InvalidCurve {
        /// Description of the broken invariant.
        message: String,
    },

    /// The analysis configuration failed validation.
    InvalidConfig {
        /// Description of the invalid setting.
        message: String,
    },

    /// Error while serializing data.
    SerializationError {
        /// Underlying error message.
        message: String,
    },

    /// Error while deserializing data.
    DeserializationError {
        /// Underlying error message.
        message: String,
    },

    /// Report checksum does not match its payload.
    ChecksumMismatch {
        /// Checksum stored in the package.
        expected: String,
        /// Checksum recomputed from the payload.
        actual: String,
    },

    /// Report package written with an unknown format version.
    UnsupportedVersion {
        /// Version found in the package.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },
}

impl fmt::Display for SmileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmileError::ExpiredContract {
                as_of,
                expiry,
                time_to_expiry,
            } => {
                write!(
                    f,
                    "contract expired: expiry {expiry} is not after {as_of} (time to expiry {time_to_expiry:.6} years)"
                )
            }
            SmileError::InvalidQuote { message } => write!(f, "invalid quote: {message}"),
            SmileError::InvalidSnapshot { message } => {
                write!(f, "invalid market snapshot: {message}")
            }
            SmileError::InvalidCurve { message } => write!(f, "invalid curve: {message}"),
            SmileError::InvalidConfig { message } => {
                write!(f, "invalid configuration: {message}")
            }
            SmileError::SerializationError { message } => {
                write!(f, "serialization error: {message}")
            }
            SmileError::DeserializationError { message } => {
                write!(f, "deserialization error: {message}")
            }
            SmileError::ChecksumMismatch { expected, actual } => {
                write!(f, "checksum mismatch: expected {expected}, got {actual}")
            }
            SmileError::UnsupportedVersion { found, expected } => {
                write!(
                    f,
                    "unsupported report version: {found} (expected {expected})"
                )
            }
        }
    }
}

impl std::error::Error for SmileError {}
