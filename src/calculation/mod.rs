//! Calculation logic for the settlement engine.
//!
//! This module contains the pure calculation functions behind a settlement:
//! delivery aggregation and day counting, tiered pricing by category, fat and
//! total solids, the delivery-frequency bonus, the period-to-period variation
//! deductions, and withholding tax.

mod delivery_aggregation;
mod frequency_bonus;
mod pricing;
mod variation;
mod withholding;

pub use delivery_aggregation::{
    AVERAGE_DAILY_KILOS_SCALE, DeliverySummary, average_daily_kilos, count_delivery_days,
    sort_deliveries, summarize_deliveries, total_kilos,
};
pub use frequency_bonus::{
    BOTH_SHIFTS_BONUS_PERCENT, EVENING_BONUS_PERCENT, FrequencyBonusResult,
    MORNING_BONUS_PERCENT, ShiftCounts, calculate_frequency_bonus, count_shifts,
    frequency_bonus_percent,
};
pub use pricing::{
    BasePaymentsResult, CATEGORY_A_RATE, CATEGORY_B_RATE, CATEGORY_C_RATE, CATEGORY_D_RATE,
    FAT_RATE_BANDS, SOLIDS_RATE_BANDS, calculate_base_payments, category_rate, fat_rate,
    price_by_category, price_by_fat, price_by_solids, solids_rate,
};
pub use variation::{
    VARIATION_SCALE, VariationDeductionsResult, VolumeVariationResult,
    calculate_variation_deductions, calculate_volume_variation, deduction_amount,
    fat_deduction_percent, relative_decrease, solids_deduction_percent, volume_deduction_percent,
    volume_variation,
};
pub use withholding::{WithholdingResult, calculate_withholding, withholding_amount};
