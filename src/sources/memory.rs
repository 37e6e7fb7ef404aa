//! In-memory collaborators.
//!
//! [`InMemorySources`] serves deliveries, lab reports and supplier profiles from
//! a [`Dataset`] (usually loaded from YAML). [`InMemorySettlementStore`] keeps the
//! last computed snapshot of settlements.

use std::path::Path;
use std::sync::{PoisonError, RwLock};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::relative_decrease;
use crate::config::load_yaml;
use crate::error::{SettlementError, SettlementResult};
use crate::models::{
    DeliveryRecord, LabReport, Period, SettlementRecord, SupplierProfile, parse_percent,
};

use super::traits::{DeliverySource, QualitySource, SettlementStore, SupplierDirectory};

/// Source data for [`InMemorySources`].
///
/// # Example
///
/// ```
/// use quincena_settlement::sources::Dataset;
///
/// let dataset: Dataset = serde_yaml::from_str(r#"
/// suppliers:
///   - code: "01001"
///     name: Los Alamos
///     category: A
/// deliveries:
///   - date: 2024-03-01
///     shift: M
///     supplier_code: "01001"
///     kilos: 120
/// lab_reports:
///   - supplier_code: "01001"
///     period: 2024/03/Q1
///     fat_percent: "20"
///     solids_percent: "19"
/// "#).unwrap();
/// assert_eq!(dataset.deliveries.len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Supplier directory entries.
    #[serde(default)]
    pub suppliers: Vec<SupplierProfile>,
    /// Delivery records; each is assigned to the period containing its date.
    #[serde(default)]
    pub deliveries: Vec<DeliveryRecord>,
    /// Laboratory reports, one per supplier per period.
    #[serde(default)]
    pub lab_reports: Vec<LabReport>,
}

/// Deliveries, lab reports and supplier profiles held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySources {
    dataset: Dataset,
}

impl InMemorySources {
    /// Wraps a dataset.
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    /// Loads a dataset from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> SettlementResult<Self> {
        load_yaml::<Dataset>(path.as_ref()).map(Self::new)
    }

    /// Returns the underlying dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    fn find_report(&self, period: &Period, supplier_code: &str) -> Option<&LabReport> {
        self.dataset.lab_reports.iter().find(|report| {
            report.supplier_code == supplier_code
                && report.period.parse::<Period>().is_ok_and(|p| p == *period)
        })
    }

    /// Absolute percentage change of a lab value versus the prior period's report.
    ///
    /// Zero when there is no prior report or the prior value is zero.
    fn variation_against_prior(
        &self,
        period: &Period,
        supplier_code: &str,
        current: i32,
        field: &str,
        select: fn(&LabReport) -> &str,
    ) -> SettlementResult<Decimal> {
        let Some(prior_report) = self.find_report(&period.previous(), supplier_code) else {
            return Ok(Decimal::ZERO);
        };
        let prior = parse_percent(field, select(prior_report))?;
        Ok(relative_decrease(Decimal::from(prior), Decimal::from(current)).abs())
    }
}

impl DeliverySource for InMemorySources {
    fn list_deliveries(
        &self,
        period: &Period,
        supplier_code: &str,
    ) -> SettlementResult<Vec<DeliveryRecord>> {
        Ok(self
            .dataset
            .deliveries
            .iter()
            .filter(|d| d.supplier_code == supplier_code && period.contains_date(d.date))
            .cloned()
            .collect())
    }
}

impl QualitySource for InMemorySources {
    fn list_readings(&self) -> SettlementResult<Vec<LabReport>> {
        Ok(self.dataset.lab_reports.clone())
    }

    fn get_reading(
        &self,
        period: &Period,
        supplier_code: &str,
    ) -> SettlementResult<Option<LabReport>> {
        Ok(self.find_report(period, supplier_code).cloned())
    }

    fn fat_variation(
        &self,
        period: &Period,
        supplier_code: &str,
        fat_percent: i32,
    ) -> SettlementResult<Decimal> {
        self.variation_against_prior(period, supplier_code, fat_percent, "fat_percent", |r| {
            r.fat_percent.as_str()
        })
    }

    fn solids_variation(
        &self,
        period: &Period,
        supplier_code: &str,
        solids_percent: i32,
    ) -> SettlementResult<Decimal> {
        self.variation_against_prior(
            period,
            supplier_code,
            solids_percent,
            "solids_percent",
            |r| r.solids_percent.as_str(),
        )
    }
}

impl SupplierDirectory for InMemorySources {
    fn get_supplier(&self, code: &str) -> SettlementResult<SupplierProfile> {
        self.dataset
            .suppliers
            .iter()
            .find(|s| s.code == code)
            .cloned()
            .ok_or_else(|| SettlementError::SupplierNotFound {
                code: code.to_string(),
            })
    }
}

/// Holds the last computed settlement snapshot.
#[derive(Debug, Default)]
pub struct InMemorySettlementStore {
    records: RwLock<Vec<SettlementRecord>>,
}

impl InMemorySettlementStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> SettlementError {
    SettlementError::SourceUnavailable {
        source_name: "settlements".to_string(),
        message: "settlement store lock poisoned".to_string(),
    }
}

impl SettlementStore for InMemorySettlementStore {
    fn persist(&self, record: SettlementRecord) -> SettlementResult<()> {
        self.records.write().map_err(poisoned)?.push(record);
        Ok(())
    }

    fn clear(&self) -> SettlementResult<()> {
        self.records.write().map_err(poisoned)?.clear();
        Ok(())
    }

    fn list(&self) -> SettlementResult<Vec<SettlementRecord>> {
        Ok(self.records.read().map_err(poisoned)?.clone())
    }

    fn replace_all(&self, records: Vec<SettlementRecord>) -> SettlementResult<()> {
        *self.records.write().map_err(poisoned)? = records;
        Ok(())
    }
}
