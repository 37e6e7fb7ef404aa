//! Tiered pricing: category, fat and total-solids payments.
//!
//! Each component is a per-kilo rate chosen from a fixed table, multiplied by
//! the kilos delivered in the period. No rounding is applied.

use rust_decimal::Decimal;

use crate::models::{AuditStep, Category};

/// Per-kilo rate for category A suppliers.
pub const CATEGORY_A_RATE: Decimal = Decimal::from_parts(700, 0, 0, false, 0);
/// Per-kilo rate for category B suppliers.
pub const CATEGORY_B_RATE: Decimal = Decimal::from_parts(550, 0, 0, false, 0);
/// Per-kilo rate for category C suppliers.
pub const CATEGORY_C_RATE: Decimal = Decimal::from_parts(400, 0, 0, false, 0);
/// Per-kilo rate for category D suppliers.
pub const CATEGORY_D_RATE: Decimal = Decimal::from_parts(250, 0, 0, false, 0);

/// Fat bands as `(lowest percent, per-kilo rate)`, highest band first.
pub const FAT_RATE_BANDS: [(i32, Decimal); 3] = [
    (46, Decimal::from_parts(120, 0, 0, false, 0)),
    (21, Decimal::from_parts(80, 0, 0, false, 0)),
    (0, Decimal::from_parts(30, 0, 0, false, 0)),
];

/// Total-solids bands as `(lowest percent, per-kilo rate)`, highest band first.
/// The two lowest bands are penalties.
pub const SOLIDS_RATE_BANDS: [(i32, Decimal); 4] = [
    (36, Decimal::from_parts(150, 0, 0, false, 0)),
    (19, Decimal::from_parts(95, 0, 0, false, 0)),
    (8, Decimal::from_parts(90, 0, 0, true, 0)),
    (0, Decimal::from_parts(130, 0, 0, true, 0)),
];

/// The three base payment components for a settlement.
#[derive(Debug, Clone)]
pub struct BasePaymentsResult {
    /// Category rate times kilos.
    pub milk_payment: Decimal,
    /// Fat band rate times kilos.
    pub fat_payment: Decimal,
    /// Solids band rate times kilos (may be negative).
    pub solids_payment: Decimal,
    /// Audit steps for the three components, in that order.
    pub audit_steps: Vec<AuditStep>,
}

/// Returns the per-kilo rate for a supplier category; zero for unrecognized ones.
pub fn category_rate(category: &Category) -> Decimal {
    match category {
        Category::A => CATEGORY_A_RATE,
        Category::B => CATEGORY_B_RATE,
        Category::C => CATEGORY_C_RATE,
        Category::D => CATEGORY_D_RATE,
        Category::Unrecognized(_) => Decimal::ZERO,
    }
}

fn band_rate(bands: &[(i32, Decimal)], percent: i32) -> Decimal {
    bands
        .iter()
        .find(|(lowest, _)| percent >= *lowest)
        .map(|(_, rate)| *rate)
        .unwrap_or(Decimal::ZERO)
}

/// Returns the per-kilo fat rate: 0-20% pays 30, 21-45% pays 80, 46% and up pays 120.
/// Negative percentages pay nothing.
pub fn fat_rate(fat_percent: i32) -> Decimal {
    band_rate(&FAT_RATE_BANDS, fat_percent)
}

/// Returns the per-kilo solids rate: 0-7% is -130, 8-18% is -90, 19-35% pays 95,
/// 36% and up pays 150. Negative percentages pay nothing.
pub fn solids_rate(solids_percent: i32) -> Decimal {
    band_rate(&SOLIDS_RATE_BANDS, solids_percent)
}

/// Payment for the delivered volume at the supplier's category rate.
///
/// # Example
///
/// ```
/// use quincena_settlement::calculation::price_by_category;
/// use quincena_settlement::models::Category;
/// use rust_decimal::Decimal;
///
/// assert_eq!(price_by_category(&Category::A, Decimal::from(1000)), Decimal::from(700_000));
/// assert_eq!(price_by_category(&Category::from("X"), Decimal::from(1000)), Decimal::ZERO);
/// ```
pub fn price_by_category(category: &Category, total_kilos: Decimal) -> Decimal {
    category_rate(category) * total_kilos
}

/// Payment for the fat band.
pub fn price_by_fat(fat_percent: i32, total_kilos: Decimal) -> Decimal {
    fat_rate(fat_percent) * total_kilos
}

/// Payment (or penalty) for the total-solids band.
///
/// # Example
///
/// ```
/// use quincena_settlement::calculation::price_by_solids;
/// use rust_decimal::Decimal;
///
/// assert_eq!(price_by_solids(7, Decimal::from(10)), Decimal::from(-1300));
/// assert_eq!(price_by_solids(19, Decimal::from(10)), Decimal::from(950));
/// ```
pub fn price_by_solids(solids_percent: i32, total_kilos: Decimal) -> Decimal {
    solids_rate(solids_percent) * total_kilos
}

/// Computes the milk, fat and solids payments with their audit steps.
pub fn calculate_base_payments(
    category: &Category,
    fat_percent: i32,
    solids_percent: i32,
    total_kilos: Decimal,
    step_number: u32,
) -> BasePaymentsResult {
    let kilos = total_kilos.normalize();

    let milk_rate = category_rate(category);
    let milk_payment = milk_rate * total_kilos;
    let milk_step = AuditStep {
        step_number,
        rule_id: "price_by_category".to_string(),
        rule_name: "Category Price".to_string(),
        input: serde_json::json!({
            "category": category.as_str(),
            "total_kilos": kilos.to_string()
        }),
        output: serde_json::json!({
            "rate": milk_rate.to_string(),
            "amount": milk_payment.normalize().to_string()
        }),
        reasoning: if milk_rate.is_zero() {
            format!("Category '{}' has no price; milk payment is 0", category.as_str())
        } else {
            format!(
                "Category {}: {} kg × ${} = ${}",
                category.as_str(),
                kilos,
                milk_rate,
                milk_payment.normalize()
            )
        },
    };

    let fat_per_kilo = fat_rate(fat_percent);
    let fat_payment = fat_per_kilo * total_kilos;
    let fat_step = AuditStep {
        step_number: step_number + 1,
        rule_id: "price_by_fat".to_string(),
        rule_name: "Fat Band Price".to_string(),
        input: serde_json::json!({
            "fat_percent": fat_percent,
            "total_kilos": kilos.to_string()
        }),
        output: serde_json::json!({
            "rate": fat_per_kilo.to_string(),
            "amount": fat_payment.normalize().to_string()
        }),
        reasoning: format!(
            "{}% fat pays ${} per kg: {} kg × ${} = ${}",
            fat_percent,
            fat_per_kilo,
            kilos,
            fat_per_kilo,
            fat_payment.normalize()
        ),
    };

    let solids_per_kilo = solids_rate(solids_percent);
    let solids_payment = solids_per_kilo * total_kilos;
    let solids_step = AuditStep {
        step_number: step_number + 2,
        rule_id: "price_by_solids".to_string(),
        rule_name: "Total Solids Band Price".to_string(),
        input: serde_json::json!({
            "solids_percent": solids_percent,
            "total_kilos": kilos.to_string()
        }),
        output: serde_json::json!({
            "rate": solids_per_kilo.to_string(),
            "amount": solids_payment.normalize().to_string()
        }),
        reasoning: format!(
            "{}% total solids is ${} per kg: {} kg × ${} = ${}",
            solids_percent,
            solids_per_kilo,
            kilos,
            solids_per_kilo,
            solids_payment.normalize()
        ),
    };

    BasePaymentsResult {
        milk_payment,
        fat_payment,
        solids_payment,
        audit_steps: vec![milk_step, fat_step, solids_step],
    }
}
