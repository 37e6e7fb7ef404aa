//! Period-to-period variation and the deductions it triggers.
//!
//! Volume variation compares current kilos with the prior period's; only a
//! decrease counts. Fat and solids variations are supplied by the quality
//! source. Each variation is mapped through its own band table to a percentage
//! of the gross milk payment, and the three deductions are summed.
//!
//! The band tables are evaluated top to bottom exactly as listed. Values that
//! fall between bands (for volume, above 8 up to 9 and above 45 up to 46) match
//! no band and deduct nothing.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::AuditStep;

/// Decimal places kept for a variation percentage.
pub const VARIATION_SCALE: u32 = 4;

const fn pct(value: u32) -> Decimal {
    Decimal::from_parts(value, 0, 0, false, 0)
}

/// The deductions triggered by the three variations.
#[derive(Debug, Clone)]
pub struct VariationDeductionsResult {
    /// Band percentage for the volume variation.
    pub volume_percent: Decimal,
    /// Deduction for the volume variation.
    pub volume_deduction: Decimal,
    /// Band percentage for the fat variation.
    pub fat_percent: Decimal,
    /// Deduction for the fat variation.
    pub fat_deduction: Decimal,
    /// Band percentage for the solids variation.
    pub solids_percent: Decimal,
    /// Deduction for the solids variation.
    pub solids_deduction: Decimal,
    /// Audit steps for volume, fat and solids, in that order.
    pub audit_steps: Vec<AuditStep>,
}

impl VariationDeductionsResult {
    /// Sum of the three deductions.
    pub fn total(&self) -> Decimal {
        self.volume_deduction + self.fat_deduction + self.solids_deduction
    }
}

/// Signed percentage drop from `prior` to `current`, rounded to four places.
///
/// Positive when `current` is lower than `prior`. Returns zero when `prior` is
/// zero instead of dividing by it.
///
/// # Example
///
/// ```
/// use quincena_settlement::calculation::relative_decrease;
/// use rust_decimal::Decimal;
///
/// assert_eq!(relative_decrease(Decimal::from(2000), Decimal::from(1500)), Decimal::from(25));
/// assert_eq!(relative_decrease(Decimal::ZERO, Decimal::from(1500)), Decimal::ZERO);
/// ```
pub fn relative_decrease(prior: Decimal, current: Decimal) -> Decimal {
    if prior.is_zero() {
        return Decimal::ZERO;
    }
    ((prior - current) * Decimal::ONE_HUNDRED / prior)
        .round_dp_with_strategy(VARIATION_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Volume variation in percent, never negative.
///
/// Without prior-period data the prior volume is taken to equal the current
/// one, so the variation is zero. Increases clamp to zero.
pub fn volume_variation(current_kilos: Decimal, prior_kilos: Option<Decimal>) -> Decimal {
    let prior = prior_kilos.unwrap_or(current_kilos);
    let variation = relative_decrease(prior, current_kilos);
    if variation <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        variation
    }
}

/// The volume variation and how it was reached.
#[derive(Debug, Clone)]
pub struct VolumeVariationResult {
    /// Prior-period kilos used, or `None` when the prior period had no deliveries.
    pub prior_kilos: Option<Decimal>,
    /// Decrease versus the prior period, in percent.
    pub variation: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the volume variation with its audit step.
pub fn calculate_volume_variation(
    current_kilos: Decimal,
    prior_kilos: Option<Decimal>,
    step_number: u32,
) -> VolumeVariationResult {
    let variation = volume_variation(current_kilos, prior_kilos);

    let reasoning = match prior_kilos {
        None => format!(
            "No prior-period deliveries; prior volume taken as current {} kg, variation 0%",
            current_kilos.normalize()
        ),
        Some(prior) if prior.is_zero() => {
            "Prior-period volume is 0 kg; variation treated as 0%".to_string()
        }
        Some(prior) if variation.is_zero() => format!(
            "{} kg is not below the prior {} kg; variation 0%",
            current_kilos.normalize(),
            prior.normalize()
        ),
        Some(prior) => format!(
            "({} - {}) × 100 / {} = {}%",
            prior.normalize(),
            current_kilos.normalize(),
            prior.normalize(),
            variation.normalize()
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "volume_variation".to_string(),
        rule_name: "Volume Variation".to_string(),
        input: serde_json::json!({
            "current_kilos": current_kilos.normalize().to_string(),
            "prior_kilos": prior_kilos.map(|k| k.normalize().to_string())
        }),
        output: serde_json::json!({
            "variation_percent": variation.normalize().to_string()
        }),
        reasoning,
    };

    VolumeVariationResult {
        prior_kilos,
        variation,
        audit_step,
    }
}

/// Deduction band for volume variation: `[0,8]` 0%, `(9,25]` 7%, `(25,45]` 15%, `>46` 30%.
pub fn volume_deduction_percent(variation: Decimal) -> Decimal {
    if variation >= pct(0) && variation <= pct(8) {
        Decimal::ZERO
    } else if variation > pct(9) && variation <= pct(25) {
        pct(7)
    } else if variation > pct(25) && variation <= pct(45) {
        pct(15)
    } else if variation > pct(46) {
        pct(30)
    } else {
        Decimal::ZERO
    }
}

/// Deduction band for fat variation: `[0,15]` 0%, `(15,25]` 12%, `(25,40]` 20%, `>40` 30%.
pub fn fat_deduction_percent(variation: Decimal) -> Decimal {
    if variation >= pct(0) && variation <= pct(15) {
        Decimal::ZERO
    } else if variation > pct(15) && variation <= pct(25) {
        pct(12)
    } else if variation > pct(25) && variation <= pct(40) {
        pct(20)
    } else if variation > pct(40) {
        pct(30)
    } else {
        Decimal::ZERO
    }
}

/// Deduction band for solids variation: `[0,6]` 0%, `(6,12]` 18%, `(12,35]` 27%, `>35` 45%.
pub fn solids_deduction_percent(variation: Decimal) -> Decimal {
    if variation >= pct(0) && variation <= pct(6) {
        Decimal::ZERO
    } else if variation > pct(6) && variation <= pct(12) {
        pct(18)
    } else if variation > pct(12) && variation <= pct(35) {
        pct(27)
    } else if variation > pct(35) {
        pct(45)
    } else {
        Decimal::ZERO
    }
}

/// Applies a band percentage to the gross milk payment.
pub fn deduction_amount(band_percent: Decimal, gross_milk_payment: Decimal) -> Decimal {
    gross_milk_payment * band_percent / Decimal::ONE_HUNDRED
}

fn deduction_step(
    step_number: u32,
    metric: &str,
    variation: Decimal,
    band_percent: Decimal,
    gross: Decimal,
    deduction: Decimal,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: format!("{}_variation_deduction", metric),
        rule_name: format!("{} Variation Deduction", capitalize(metric)),
        input: serde_json::json!({
            "variation_percent": variation.normalize().to_string(),
            "gross_milk_payment": gross.normalize().to_string()
        }),
        output: serde_json::json!({
            "band_percent": band_percent.to_string(),
            "deduction": deduction.normalize().to_string()
        }),
        reasoning: format!(
            "{}% {} variation falls in the {}% band: ${} × {}% = ${}",
            variation.normalize(),
            metric,
            band_percent,
            gross.normalize(),
            band_percent,
            deduction.normalize()
        ),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Maps the three variations to deductions against the gross milk payment.
///
/// # Example
///
/// ```
/// use quincena_settlement::calculation::calculate_variation_deductions;
/// use rust_decimal::Decimal;
///
/// let result = calculate_variation_deductions(
///     Decimal::from(25),
///     Decimal::from(8),
///     Decimal::from(10),
///     Decimal::from(1_395_000),
///     1,
/// );
/// assert_eq!(result.volume_deduction, Decimal::from(97_650));
/// assert_eq!(result.fat_deduction, Decimal::ZERO);
/// assert_eq!(result.solids_deduction, Decimal::from(251_100));
/// ```
pub fn calculate_variation_deductions(
    volume_variation: Decimal,
    fat_variation: Decimal,
    solids_variation: Decimal,
    gross_milk_payment: Decimal,
    step_number: u32,
) -> VariationDeductionsResult {
    let volume_percent = volume_deduction_percent(volume_variation);
    let volume_deduction = deduction_amount(volume_percent, gross_milk_payment);

    let fat_percent = fat_deduction_percent(fat_variation);
    let fat_deduction = deduction_amount(fat_percent, gross_milk_payment);

    let solids_percent = solids_deduction_percent(solids_variation);
    let solids_deduction = deduction_amount(solids_percent, gross_milk_payment);

    let audit_steps = vec![
        deduction_step(
            step_number,
            "volume",
            volume_variation,
            volume_percent,
            gross_milk_payment,
            volume_deduction,
        ),
        deduction_step(
            step_number + 1,
            "fat",
            fat_variation,
            fat_percent,
            gross_milk_payment,
            fat_deduction,
        ),
        deduction_step(
            step_number + 2,
            "solids",
            solids_variation,
            solids_percent,
            gross_milk_payment,
            solids_deduction,
        ),
    ];

    VariationDeductionsResult {
        volume_percent,
        volume_deduction,
        fat_percent,
        fat_deduction,
        solids_percent,
        solids_deduction,
        audit_steps,
    }
}
