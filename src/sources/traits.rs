//! Collaborator interfaces the settlement engine depends on.
//!
//! Each external lookup is an injected capability so the arithmetic can be
//! exercised against in-memory fakes. Implementations own their transport,
//! retries and timeouts; the engine only sees [`SettlementResult`]s.

use rust_decimal::Decimal;

use crate::error::SettlementResult;
use crate::models::{DeliveryRecord, LabReport, Period, SettlementRecord, SupplierProfile};

/// Supplies raw delivery records.
pub trait DeliverySource: Send + Sync {
    /// Lists a supplier's deliveries for a period.
    ///
    /// A supplier or period with no deliveries yields an empty list, not an error.
    fn list_deliveries(
        &self,
        period: &Period,
        supplier_code: &str,
    ) -> SettlementResult<Vec<DeliveryRecord>>;
}

/// Supplies laboratory readings and their period-to-period variations.
pub trait QualitySource: Send + Sync {
    /// Lists every reading awaiting settlement.
    fn list_readings(&self) -> SettlementResult<Vec<LabReport>>;

    /// Returns the reading for a supplier in a period, if any.
    fn get_reading(
        &self,
        period: &Period,
        supplier_code: &str,
    ) -> SettlementResult<Option<LabReport>>;

    /// Percentage magnitude of the fat change versus the supplier's prior period.
    fn fat_variation(
        &self,
        period: &Period,
        supplier_code: &str,
        fat_percent: i32,
    ) -> SettlementResult<Decimal>;

    /// Percentage magnitude of the solids change versus the supplier's prior period.
    fn solids_variation(
        &self,
        period: &Period,
        supplier_code: &str,
        solids_percent: i32,
    ) -> SettlementResult<Decimal>;
}

/// Resolves supplier profiles.
pub trait SupplierDirectory: Send + Sync {
    /// Returns the supplier's profile, or `SupplierNotFound`.
    fn get_supplier(&self, code: &str) -> SettlementResult<SupplierProfile>;
}

/// Stores computed settlements.
pub trait SettlementStore: Send + Sync {
    /// Appends one settlement.
    fn persist(&self, record: SettlementRecord) -> SettlementResult<()>;

    /// Removes every stored settlement.
    fn clear(&self) -> SettlementResult<()>;

    /// Returns the stored settlements.
    fn list(&self) -> SettlementResult<Vec<SettlementRecord>>;

    /// Replaces the stored settlements with a new snapshot.
    ///
    /// The default clears then persists one by one; stores that can swap
    /// atomically should override it.
    fn replace_all(&self, records: Vec<SettlementRecord>) -> SettlementResult<()> {
        self.clear()?;
        for record in records {
            self.persist(record)?;
        }
        Ok(())
    }
}
