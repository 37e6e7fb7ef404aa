//! Configuration types for settlement calculation.
//!
//! This module contains the strongly-typed configuration structure that is
//! deserialized from `settlement.yaml`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default withholding tax rate, in percent.
pub const DEFAULT_WITHHOLDING_RATE_PERCENT: Decimal = Decimal::from_parts(13, 0, 0, false, 0);

/// Default payment above which withholding applies.
pub const DEFAULT_WITHHOLDING_THRESHOLD: Decimal = Decimal::from_parts(950_000, 0, 0, false, 0);

/// Default number of calendar days used to average daily kilos.
pub const DEFAULT_DAYS_PER_PERIOD: u32 = 15;

/// Default number of deliveries in a shift that must be exceeded to earn a bonus.
pub const DEFAULT_SHIFT_BONUS_THRESHOLD: u32 = 10;

/// Process-wide settlement constants.
///
/// Missing keys in the YAML file fall back to the defaults above.
///
/// # Example
///
/// ```
/// use quincena_settlement::config::SettlementConfig;
/// use rust_decimal::Decimal;
///
/// let config = SettlementConfig::default();
/// assert_eq!(config.withholding_rate_percent, Decimal::from(13));
/// assert_eq!(config.days_per_period, 15);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Withholding tax rate, in percent.
    pub withholding_rate_percent: Decimal,
    /// Payments strictly above this amount are subject to withholding.
    pub withholding_threshold: Decimal,
    /// Divisor for the average daily kilos.
    pub days_per_period: u32,
    /// A shift count must exceed this to earn the frequency bonus.
    pub shift_bonus_threshold: u32,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            withholding_rate_percent: DEFAULT_WITHHOLDING_RATE_PERCENT,
            withholding_threshold: DEFAULT_WITHHOLDING_THRESHOLD,
            days_per_period: DEFAULT_DAYS_PER_PERIOD,
            shift_bonus_threshold: DEFAULT_SHIFT_BONUS_THRESHOLD,
        }
    }
}
