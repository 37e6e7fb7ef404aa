//! Delivery aggregation: total volume, delivery-day count and daily average.
//!
//! A morning and an evening delivery on the same date count as one delivery
//! day; two single shifts on different dates count as two.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{AuditStep, DeliveryRecord};

/// Decimal places kept for the average daily kilos.
pub const AVERAGE_DAILY_KILOS_SCALE: u32 = 3;

/// The aggregated view of a period's deliveries.
#[derive(Debug, Clone)]
pub struct DeliverySummary {
    /// Sum of kilos over all records.
    pub total_kilos: Decimal,
    /// Number of logically distinct delivery days.
    pub delivery_days: u32,
    /// `total_kilos / days_per_period`, rounded to three places.
    pub average_daily_kilos: Decimal,
    /// The audit step recording this aggregation.
    pub audit_step: AuditStep,
}

/// Sums the delivered kilos. Zero when there are no records.
pub fn total_kilos(records: &[DeliveryRecord]) -> Decimal {
    records.iter().map(DeliveryRecord::kilos_decimal).sum()
}

/// Sorts records by date, then shift (morning first).
pub fn sort_deliveries(records: &mut [DeliveryRecord]) {
    records.sort_by(|a, b| a.date.cmp(&b.date).then(a.shift.cmp(&b.shift)));
}

/// Counts logically distinct delivery days.
///
/// `records` must be sorted by date then shift (see [`sort_deliveries`]).
/// A single record is one day. Otherwise the records are walked in order:
/// a record paired with the next one (same date, other shift) consumes both and
/// counts one day; a record followed by a different date counts one day; the last
/// record, when not already consumed by a pair, counts one day unless it repeats
/// the previous record's date and shift.
///
/// # Examples
///
/// ```
/// use quincena_settlement::calculation::count_delivery_days;
/// use quincena_settlement::models::{DeliveryRecord, Shift};
/// use chrono::NaiveDate;
///
/// let record = |day, shift| DeliveryRecord {
///     date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
///     shift,
///     supplier_code: "01001".to_string(),
///     kilos: 50,
/// };
///
/// // Morning and evening on the 1st, morning on the 2nd.
/// let records = vec![
///     record(1, Shift::Morning),
///     record(1, Shift::Evening),
///     record(2, Shift::Morning),
/// ];
/// assert_eq!(count_delivery_days(&records), 2);
/// ```
pub fn count_delivery_days(records: &[DeliveryRecord]) -> u32 {
    if records.len() == 1 {
        return 1;
    }

    let mut days = 0;
    let mut i = 0;
    while i < records.len() {
        let current = &records[i];
        match records.get(i + 1) {
            Some(next) => {
                if current.date == next.date && current.shift != next.shift {
                    i += 1;
                    days += 1;
                } else if current.date != next.date {
                    days += 1;
                }
            }
            None => {
                // i >= 1 here: a lone record returned above.
                let previous = &records[i - 1];
                if current.date != previous.date || current.shift != previous.shift {
                    days += 1;
                }
            }
        }
        i += 1;
    }
    days
}

/// Averages the kilos over the fixed number of days in a period.
///
/// The divisor does not depend on how many days milk was actually delivered.
/// A zero divisor yields zero.
pub fn average_daily_kilos(total_kilos: Decimal, days_per_period: u32) -> Decimal {
    if days_per_period == 0 {
        return Decimal::ZERO;
    }
    (total_kilos / Decimal::from(days_per_period)).round_dp_with_strategy(
        AVERAGE_DAILY_KILOS_SCALE,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Aggregates a period's deliveries into totals and a day count.
///
/// The records are sorted internally; callers may pass them in any order.
///
/// # Example
///
/// ```
/// use quincena_settlement::calculation::summarize_deliveries;
/// use rust_decimal::Decimal;
///
/// let summary = summarize_deliveries(&[], 15, 1);
/// assert_eq!(summary.total_kilos, Decimal::ZERO);
/// assert_eq!(summary.delivery_days, 0);
/// ```
pub fn summarize_deliveries(
    records: &[DeliveryRecord],
    days_per_period: u32,
    step_number: u32,
) -> DeliverySummary {
    let mut sorted = records.to_vec();
    sort_deliveries(&mut sorted);

    let total = total_kilos(&sorted);
    let delivery_days = count_delivery_days(&sorted);
    let average = average_daily_kilos(total, days_per_period);

    let audit_step = AuditStep {
        step_number,
        rule_id: "delivery_aggregation".to_string(),
        rule_name: "Delivery Aggregation".to_string(),
        input: serde_json::json!({
            "records": sorted.len(),
            "days_per_period": days_per_period
        }),
        output: serde_json::json!({
            "total_kilos": total.normalize().to_string(),
            "delivery_days": delivery_days,
            "average_daily_kilos": average.normalize().to_string()
        }),
        reasoning: format!(
            "{} records totalling {} kg over {} delivery days; {} kg / {} days = {} kg per day",
            sorted.len(),
            total.normalize(),
            delivery_days,
            total.normalize(),
            days_per_period,
            average.normalize()
        ),
    };

    DeliverySummary {
        total_kilos: total,
        delivery_days,
        average_daily_kilos: average,
        audit_step,
    }
}
