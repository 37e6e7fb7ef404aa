//! Error types for the quincena settlement engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing a settlement.

use thiserror::Error;

/// The main error type for the settlement engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use quincena_settlement::error::SettlementError;
///
/// let error = SettlementError::MalformedInput {
///     field: "fat_percent".to_string(),
///     value: "abc".to_string(),
/// };
/// assert_eq!(error.to_string(), "Malformed value for 'fat_percent': 'abc'");
/// ```
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An input value could not be interpreted (e.g. a non-numeric fat percentage).
    #[error("Malformed value for '{field}': '{value}'")]
    MalformedInput {
        /// The field holding the malformed value.
        field: String,
        /// The raw value as received.
        value: String,
    },

    /// A period identifier was not of the form `YYYY/MM/Q1` or `YYYY/MM/Q2`.
    #[error("Invalid period '{value}': {message}")]
    InvalidPeriod {
        /// The raw period identifier.
        value: String,
        /// A description of what made the period invalid.
        message: String,
    },

    /// The supplier directory has no profile for the given code.
    #[error("Supplier not found: {code}")]
    SupplierNotFound {
        /// The supplier code that was not found.
        code: String,
    },

    /// No laboratory reading exists for the supplier in the period.
    #[error("No quality reading for supplier '{supplier_code}' in period {period}")]
    QualityReadingNotFound {
        /// The period that was requested.
        period: String,
        /// The supplier code that was requested.
        supplier_code: String,
    },

    /// An external data source failed or returned an unusable response.
    #[error("Source '{source_name}' unavailable: {message}")]
    SourceUnavailable {
        /// Name of the failing source (e.g. "deliveries").
        source_name: String,
        /// A description of the failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return SettlementError.
pub type SettlementResult<T> = Result<T, SettlementError>;
