//! Tabular output of a smile analysis

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::trace;

use super::builder::Curve;
use super::error::SmileError;
use super::quote::PricingParameters;

/// Result of one analysis run, ready for tabular consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmileReport {
    /// Underlying spot price
    pub spot: f64,

    /// Date of the market snapshot
    pub as_of: NaiveDate,

    /// Expiry date of the analysed chain
    pub expiry: NaiveDate,

    /// Rate and time to expiry used for every quote
    pub pricing: PricingParameters,

    /// Call side implied volatility curve
    pub calls: Curve,

    /// Put side implied volatility curve
    pub puts: Curve,

    /// Timestamp when the report was created (milliseconds since epoch)
    pub generated_at: u64,
}

impl SmileReport {
    /// Shared upper limit for plotting both sides: the highest computed or
    /// reference volatility across calls and puts.
    pub fn vol_ceiling(&self) -> Option<f64> {
        let ceiling = match (self.calls.max_vol(), self.puts.max_vol()) {
            (Some(calls), Some(puts)) => Some(calls.max(puts)),
            (calls, puts) => calls.or(puts),
        };
        trace!("vol_ceiling: {:?}", ceiling);
        ceiling
    }

    /// Total number of admissible points on both sides
    pub fn point_count(&self) -> usize {
        self.calls.len() + self.puts.len()
    }
}

/// Format version used for checksum-enabled smile reports.
pub const SMILE_REPORT_FORMAT_VERSION: u32 = 1;

/// Wrapper that provides checksum validation for `SmileReport` instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmileReportPackage {
    /// Version of the report schema for forward compatibility.
    pub version: u32,
    /// Report payload.
    pub report: SmileReport,
    /// Hex-encoded checksum of the serialized report.
    pub checksum: String,
}

impl SmileReportPackage {
    /// Creates a new report package computing the checksum of the report contents.
    pub fn new(report: SmileReport) -> Result<Self, SmileError> {
        let checksum = Self::compute_checksum(&report)?;

        Ok(Self {
            version: SMILE_REPORT_FORMAT_VERSION,
            report,
            checksum,
        })
    }

    /// Serializes the package to JSON.
    pub fn to_json(&self) -> Result<String, SmileError> {
        serde_json::to_string(self).map_err(|error| SmileError::SerializationError {
            message: error.to_string(),
        })
    }

    /// Deserializes the package from JSON.
    pub fn from_json(data: &str) -> Result<Self, SmileError> {
        serde_json::from_str(data).map_err(|error| SmileError::DeserializationError {
            message: error.to_string(),
        })
    }

    /// Validates the checksum and version.
    pub fn validate(&self) -> Result<(), SmileError> {
        if self.version != SMILE_REPORT_FORMAT_VERSION {
            return Err(SmileError::UnsupportedVersion {
                found: self.version,
                expected: SMILE_REPORT_FORMAT_VERSION,
            });
        }

        let computed = Self::compute_checksum(&self.report)?;
        if computed != self.checksum {
            return Err(SmileError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual: computed,
            });
        }

        Ok(())
    }

    /// Consumes the package and returns the validated report.
    pub fn into_report(self) -> Result<SmileReport, SmileError> {
        self.validate()?;
        Ok(self.report)
    }

    fn compute_checksum(report: &SmileReport) -> Result<String, SmileError> {
        let payload =
            serde_json::to_vec(report).map_err(|error| SmileError::SerializationError {
                message: error.to_string(),
            })?;

        let mut hasher = Sha256::new();
        hasher.update(payload);

        let checksum_bytes = hasher.finalize();
        Ok(format!("{:x}", checksum_bytes))
    }
}
