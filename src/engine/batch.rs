//! Batch recomputation over every pending lab reading.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::SettlementResult;
use crate::sources::{QualitySource, SettlementStore};

use super::assembler::SettlementEngine;

/// A reading the batch could not settle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// Period as it appeared on the lab report.
    pub period: String,
    /// Supplier the reading belongs to.
    pub supplier_code: String,
    /// Why the settlement failed.
    pub error: String,
}

/// Outcome of one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Identifies this run in logs.
    pub run_id: Uuid,
    /// Number of settlements written to the store.
    pub computed: usize,
    /// Readings that were skipped.
    pub failures: Vec<BatchFailure>,
    /// Wall-clock time of the run, in microseconds.
    pub duration_us: u64,
}

impl SettlementEngine {
    /// Recomputes every pending settlement and replaces the stored snapshot.
    ///
    /// A reading that fails is logged, reported in
    /// [`BatchReport::failures`], and skipped; the run continues with the
    /// next one. Only failing to list the readings, or to write the new
    /// snapshot, fails the whole batch.
    pub fn compute_all_pending(&self) -> SettlementResult<BatchReport> {
        let started = Instant::now();
        let run_id = Uuid::new_v4();

        let readings = self.quality().list_readings().inspect_err(|e| {
            error!(run_id = %run_id, error = %e, "Could not list pending readings");
        })?;
        info!(run_id = %run_id, pending = readings.len(), "Settlement batch started");

        let mut records = Vec::with_capacity(readings.len());
        let mut failures = Vec::new();

        for report in &readings {
            match self.compute_settlement_for_reading(report) {
                Ok(calculation) => records.push(calculation.record),
                Err(e) => {
                    warn!(
                        run_id = %run_id,
                        supplier_code = %report.supplier_code,
                        period = %report.period,
                        error = %e,
                        "Settlement failed; skipping"
                    );
                    failures.push(BatchFailure {
                        period: report.period.clone(),
                        supplier_code: report.supplier_code.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let computed = records.len();
        self.store().replace_all(records)?;

        let duration_us = started.elapsed().as_micros() as u64;
        info!(
            run_id = %run_id,
            computed,
            failed = failures.len(),
            duration_us,
            "Settlement batch finished"
        );

        Ok(BatchReport {
            run_id,
            computed,
            failures,
            duration_us,
        })
    }
}
