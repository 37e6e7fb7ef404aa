//! Request types for the settlement API.

use serde::{Deserialize, Serialize};

use crate::models::Period;

/// Request body for `POST /settlements/compute`.
///
/// ```
/// use quincena_settlement::api::ComputeSettlementRequest;
///
/// let request: ComputeSettlementRequest =
///     serde_json::from_str(r#"{"period":"2024/03/Q1","supplier_code":"01001"}"#).unwrap();
/// assert_eq!(request.period.to_string(), "2024/03/Q1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeSettlementRequest {
    /// The settlement period, written `YYYY/MM/Q1` or `YYYY/MM/Q2`.
    pub period: Period,
    /// The supplier to settle.
    pub supplier_code: String,
}
