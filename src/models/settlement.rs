//! Settlement result models.
//!
//! This module contains the [`SettlementRecord`] produced once per supplier per
//! period, and the [`AuditTrace`] that records how each figure was reached.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Period;

/// The computed settlement (planilla) for one supplier in one period.
///
/// Every field is derived from the supplier's deliveries, lab reading and
/// profile for the period, plus the prior period's deliveries for the volume
/// variation. A record is never updated in place; recomputing produces a new one.
///
/// # Example
///
/// ```
/// use quincena_settlement::models::{Period, SettlementRecord};
/// use rust_decimal::Decimal;
///
/// let record = SettlementRecord {
///     period: "2024/03/Q1".parse().unwrap(),
///     supplier_code: "01001".to_string(),
///     supplier_name: "Los Alamos".to_string(),
///     total_kilos: Decimal::from(1000),
///     delivery_days: 15,
///     average_daily_kilos: Decimal::new(66667, 3),
///     volume_variation_percent: Decimal::ZERO,
///     fat_percent: 20,
///     fat_variation_percent: Decimal::ZERO,
///     solids_percent: 19,
///     solids_variation_percent: Decimal::ZERO,
///     milk_payment: Decimal::from(700_000),
///     fat_payment: Decimal::from(30_000),
///     solids_payment: Decimal::from(95_000),
///     frequency_bonus: Decimal::from(84_000),
///     volume_variation_deduction: Decimal::ZERO,
///     fat_variation_deduction: Decimal::ZERO,
///     solids_variation_deduction: Decimal::ZERO,
///     gross_payment: Decimal::from(909_000),
///     payment_after_deductions: Decimal::from(909_000),
///     withholding: Decimal::ZERO,
///     net_payment: Decimal::from(909_000),
/// };
/// assert_eq!(record.total_deductions(), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// The settled period.
    pub period: Period,
    /// The supplier code.
    pub supplier_code: String,
    /// The supplier name at the time of settlement.
    pub supplier_name: String,
    /// Kilos delivered in the period.
    pub total_kilos: Decimal,
    /// Number of distinct delivery days.
    pub delivery_days: u32,
    /// Total kilos divided by the days in a period, rounded to 3 places.
    pub average_daily_kilos: Decimal,
    /// Decrease in volume versus the prior period, in percent (never negative).
    pub volume_variation_percent: Decimal,
    /// Fat percentage from the lab reading.
    pub fat_percent: i32,
    /// Fat variation versus the prior period, in percent.
    pub fat_variation_percent: Decimal,
    /// Total solids percentage from the lab reading.
    pub solids_percent: i32,
    /// Solids variation versus the prior period, in percent.
    pub solids_variation_percent: Decimal,
    /// Payment for volume at the supplier's category rate.
    pub milk_payment: Decimal,
    /// Payment (per kilo) for the fat band.
    pub fat_payment: Decimal,
    /// Payment or penalty (per kilo) for the solids band.
    pub solids_payment: Decimal,
    /// Bonus for delivery frequency.
    pub frequency_bonus: Decimal,
    /// Deduction for volume variation.
    pub volume_variation_deduction: Decimal,
    /// Deduction for fat variation.
    pub fat_variation_deduction: Decimal,
    /// Deduction for solids variation.
    pub solids_variation_deduction: Decimal,
    /// Milk, fat and solids payments plus the frequency bonus.
    pub gross_payment: Decimal,
    /// Gross payment minus the three variation deductions.
    pub payment_after_deductions: Decimal,
    /// Tax withheld.
    pub withholding: Decimal,
    /// Amount payable to the supplier.
    pub net_payment: Decimal,
}

impl SettlementRecord {
    /// Returns the sum of the three variation deductions.
    pub fn total_deductions(&self) -> Decimal {
        self.volume_variation_deduction
            + self.fat_variation_deduction
            + self.solids_variation_deduction
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The complete audit trace for a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Non-fatal observations (e.g. missing prior-period data).
    pub warnings: Vec<String>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// A settlement together with the trace of how it was computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementCalculation {
    /// The settlement record.
    pub record: SettlementRecord,
    /// The audit trace.
    pub audit_trace: AuditTrace,
}
