//! Laboratory quality readings.
//!
//! [`LabReport`] is the reading as received from the laboratory, with the period
//! and percentages still in their raw text form. [`QualityReading`] is the parsed,
//! typed form the calculations work with.

use serde::{Deserialize, Serialize};

use crate::error::{SettlementError, SettlementResult};

use super::Period;

/// A laboratory report as received from the quality source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabReport {
    /// The supplier the sample belongs to.
    pub supplier_code: String,
    /// The period identifier, e.g. `"2024/03/Q1"`.
    pub period: String,
    /// Fat percentage as reported, e.g. `"21"`.
    pub fat_percent: String,
    /// Total solids percentage as reported, e.g. `"19"`.
    pub solids_percent: String,
}

/// A parsed laboratory reading for one supplier in one period.
///
/// # Example
///
/// ```
/// use quincena_settlement::models::{LabReport, QualityReading};
///
/// let report = LabReport {
///     supplier_code: "01001".to_string(),
///     period: "2024/03/Q1".to_string(),
///     fat_percent: "21".to_string(),
///     solids_percent: " 19 ".to_string(),
/// };
/// let reading = QualityReading::try_from(&report).unwrap();
/// assert_eq!(reading.fat_percent, 21);
/// assert_eq!(reading.solids_percent, 19);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReading {
    /// The supplier the sample belongs to.
    pub supplier_code: String,
    /// The settlement period of the sample.
    pub period: Period,
    /// Fat percentage (expected 0-100).
    pub fat_percent: i32,
    /// Total solids percentage (expected 0-100).
    pub solids_percent: i32,
}

/// Parses an integer percentage, reporting the offending field on failure.
pub fn parse_percent(field: &str, raw: &str) -> SettlementResult<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| SettlementError::MalformedInput {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

impl TryFrom<&LabReport> for QualityReading {
    type Error = SettlementError;

    fn try_from(report: &LabReport) -> Result<Self, Self::Error> {
        Ok(QualityReading {
            supplier_code: report.supplier_code.clone(),
            period: report.period.parse()?,
            fat_percent: parse_percent("fat_percent", &report.fat_percent)?,
            solids_percent: parse_percent("solids_percent", &report.solids_percent)?,
        })
    }
}
