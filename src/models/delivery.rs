//! Delivery (acopio) records.
//!
//! A [`DeliveryRecord`] is one shift's milk delivery for one supplier.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The delivery shift (turno).
///
/// Morning sorts before evening so that records ordered by `(date, shift)`
/// follow the order in which milk is actually collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    /// Morning collection (wire alias `M`).
    #[serde(alias = "M")]
    Morning,
    /// Evening collection (wire alias `T`).
    #[serde(alias = "T")]
    Evening,
}

/// One shift's delivery of raw milk.
///
/// # Example
///
/// ```
/// use quincena_settlement::models::{DeliveryRecord, Shift};
/// use chrono::NaiveDate;
///
/// let record = DeliveryRecord {
///     date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
///     shift: Shift::Morning,
///     supplier_code: "01001".to_string(),
///     kilos: 120,
/// };
/// assert_eq!(record.kilos_decimal().to_string(), "120");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// The calendar date of the delivery.
    pub date: NaiveDate,
    /// The shift in which the milk was collected.
    pub shift: Shift,
    /// The supplier that delivered the milk.
    pub supplier_code: String,
    /// Kilos of milk delivered.
    pub kilos: u32,
}

impl DeliveryRecord {
    /// Returns the delivered kilos as a decimal for monetary arithmetic.
    pub fn kilos_decimal(&self) -> Decimal {
        Decimal::from(self.kilos)
    }
}
