//! Delivery-frequency bonus.
//!
//! Suppliers who deliver often in a shift earn a percentage on top of the
//! category (milk) payment. The bonus never applies to the fat or solids
//! components.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, DeliveryRecord, Shift};

/// Bonus when both shift counts exceed the threshold.
pub const BOTH_SHIFTS_BONUS_PERCENT: Decimal = Decimal::from_parts(20, 0, 0, false, 0);
/// Bonus when only the morning count exceeds the threshold.
pub const MORNING_BONUS_PERCENT: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
/// Bonus when only the evening count exceeds the threshold.
pub const EVENING_BONUS_PERCENT: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Number of deliveries per shift in a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShiftCounts {
    /// Morning deliveries.
    pub morning: u32,
    /// Evening deliveries.
    pub evening: u32,
}

/// The frequency bonus and how it was reached.
#[derive(Debug, Clone)]
pub struct FrequencyBonusResult {
    /// The shift counts the bonus was based on.
    pub counts: ShiftCounts,
    /// The bonus percentage applied (0, 8, 12 or 20).
    pub bonus_percent: Decimal,
    /// The bonus amount.
    pub bonus: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Counts morning and evening deliveries independently.
pub fn count_shifts(records: &[DeliveryRecord]) -> ShiftCounts {
    records
        .iter()
        .fold(ShiftCounts::default(), |mut counts, record| {
            match record.shift {
                Shift::Morning => counts.morning += 1,
                Shift::Evening => counts.evening += 1,
            }
            counts
        })
}

/// Picks the bonus percentage for the shift counts.
///
/// # Example
///
/// ```
/// use quincena_settlement::calculation::{ShiftCounts, frequency_bonus_percent};
/// use rust_decimal::Decimal;
///
/// let counts = ShiftCounts { morning: 12, evening: 3 };
/// assert_eq!(frequency_bonus_percent(counts, 10), Decimal::from(12));
/// ```
pub fn frequency_bonus_percent(counts: ShiftCounts, threshold: u32) -> Decimal {
    match (counts.morning > threshold, counts.evening > threshold) {
        (true, true) => BOTH_SHIFTS_BONUS_PERCENT,
        (true, false) => MORNING_BONUS_PERCENT,
        (false, true) => EVENING_BONUS_PERCENT,
        (false, false) => Decimal::ZERO,
    }
}

/// Calculates the frequency bonus against the milk (category) payment.
pub fn calculate_frequency_bonus(
    records: &[DeliveryRecord],
    milk_payment: Decimal,
    threshold: u32,
    step_number: u32,
) -> FrequencyBonusResult {
    let counts = count_shifts(records);
    let bonus_percent = frequency_bonus_percent(counts, threshold);
    let bonus = bonus_percent * milk_payment / Decimal::ONE_HUNDRED;

    let audit_step = AuditStep {
        step_number,
        rule_id: "frequency_bonus".to_string(),
        rule_name: "Delivery Frequency Bonus".to_string(),
        input: serde_json::json!({
            "morning_deliveries": counts.morning,
            "evening_deliveries": counts.evening,
            "threshold": threshold,
            "milk_payment": milk_payment.normalize().to_string()
        }),
        output: serde_json::json!({
            "bonus_percent": bonus_percent.to_string(),
            "bonus": bonus.normalize().to_string()
        }),
        reasoning: format!(
            "{} morning and {} evening deliveries (threshold > {}): {}% of ${} = ${}",
            counts.morning,
            counts.evening,
            threshold,
            bonus_percent,
            milk_payment.normalize(),
            bonus.normalize()
        ),
    };

    FrequencyBonusResult {
        counts,
        bonus_percent,
        bonus,
        audit_step,
    }
}
