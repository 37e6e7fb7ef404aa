//! Withholding tax (retención).
//!
//! A flat rate is withheld from payments strictly above a threshold.

use rust_decimal::Decimal;

use crate::config::SettlementConfig;
use crate::models::AuditStep;

/// The withholding applied to a payment.
#[derive(Debug, Clone)]
pub struct WithholdingResult {
    /// Amount withheld.
    pub withholding: Decimal,
    /// Payment minus the withholding.
    pub net_payment: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns the amount withheld from `payment`.
///
/// # Example
///
/// ```
/// use quincena_settlement::calculation::withholding_amount;
/// use rust_decimal::Decimal;
///
/// let threshold = Decimal::from(950_000);
/// let rate = Decimal::from(13);
/// assert_eq!(withholding_amount(Decimal::from(1_000_000), threshold, rate), Decimal::from(130_000));
/// assert_eq!(withholding_amount(Decimal::from(950_000), threshold, rate), Decimal::ZERO);
/// ```
pub fn withholding_amount(payment: Decimal, threshold: Decimal, rate_percent: Decimal) -> Decimal {
    if payment > threshold {
        payment * rate_percent / Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// Applies withholding to the payment left after variation deductions.
pub fn calculate_withholding(
    payment: Decimal,
    config: &SettlementConfig,
    step_number: u32,
) -> WithholdingResult {
    let threshold = config.withholding_threshold;
    let rate = config.withholding_rate_percent;
    let withholding = withholding_amount(payment, threshold, rate);
    let net_payment = payment - withholding;

    let reasoning = if withholding.is_zero() {
        format!(
            "${} does not exceed the ${} threshold; nothing withheld",
            payment.normalize(),
            threshold.normalize()
        )
    } else {
        format!(
            "${} exceeds the ${} threshold; {}% withheld = ${}",
            payment.normalize(),
            threshold.normalize(),
            rate.normalize(),
            withholding.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "withholding".to_string(),
        rule_name: "Withholding Tax".to_string(),
        input: serde_json::json!({
            "payment": payment.normalize().to_string(),
            "threshold": threshold.normalize().to_string(),
            "rate_percent": rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "withholding": withholding.normalize().to_string(),
            "net_payment": net_payment.normalize().to_string()
        }),
        reasoning,
    };

    WithholdingResult {
        withholding,
        net_payment,
        audit_step,
    }
}
