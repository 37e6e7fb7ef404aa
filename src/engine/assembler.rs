//! Settlement assembly: turns one supplier's inputs for one period into a
//! [`SettlementRecord`].

use std::sync::Arc;
use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculation::{
    calculate_base_payments, calculate_frequency_bonus, calculate_variation_deductions,
    calculate_volume_variation, calculate_withholding, summarize_deliveries, total_kilos,
};
use crate::config::SettlementConfig;
use crate::error::{SettlementError, SettlementResult};
use crate::models::{
    AuditStep, AuditTrace, LabReport, Period, QualityReading, SettlementCalculation,
    SettlementRecord,
};
use crate::sources::{
    DeliverySource, InMemorySettlementStore, InMemorySources, QualitySource, SettlementStore,
    SupplierDirectory,
};

/// The external capabilities the engine reads from and writes to.
#[derive(Clone)]
pub struct Collaborators {
    /// Delivery records by period and supplier.
    pub deliveries: Arc<dyn DeliverySource>,
    /// Lab readings and their variations.
    pub quality: Arc<dyn QualitySource>,
    /// Supplier profiles.
    pub suppliers: Arc<dyn SupplierDirectory>,
    /// Where batch results are written.
    pub store: Arc<dyn SettlementStore>,
}

impl Collaborators {
    /// Serves all lookups from one in-memory dataset, with an empty store.
    pub fn in_memory(sources: InMemorySources) -> Self {
        let sources = Arc::new(sources);
        Self {
            deliveries: sources.clone(),
            quality: sources.clone(),
            suppliers: sources,
            store: Arc::new(InMemorySettlementStore::new()),
        }
    }
}

/// Computes supplier settlements.
///
/// The engine holds no mutable state of its own; concurrent calls for
/// different suppliers or periods are independent.
///
/// # Example
///
/// ```
/// use quincena_settlement::config::SettlementConfig;
/// use quincena_settlement::engine::{Collaborators, SettlementEngine};
/// use quincena_settlement::sources::{Dataset, InMemorySources};
///
/// let engine = SettlementEngine::new(
///     SettlementConfig::default(),
///     Collaborators::in_memory(InMemorySources::new(Dataset::default())),
/// );
/// let report = engine.compute_all_pending().unwrap();
/// assert_eq!(report.computed, 0);
/// ```
#[derive(Clone)]
pub struct SettlementEngine {
    config: Arc<SettlementConfig>,
    collaborators: Collaborators,
}

impl SettlementEngine {
    /// Creates an engine over the given configuration and collaborators.
    pub fn new(config: SettlementConfig, collaborators: Collaborators) -> Self {
        Self {
            config: Arc::new(config),
            collaborators,
        }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Returns the settlement store.
    pub fn store(&self) -> &dyn SettlementStore {
        self.collaborators.store.as_ref()
    }

    pub(super) fn quality(&self) -> &dyn QualitySource {
        self.collaborators.quality.as_ref()
    }

    /// Computes the settlement for a supplier in a period.
    ///
    /// Looks up the supplier's lab reading for the period and delegates to
    /// [`compute_settlement_for_reading`](Self::compute_settlement_for_reading).
    /// Nothing is persisted.
    pub fn compute_settlement(
        &self,
        period: &Period,
        supplier_code: &str,
    ) -> SettlementResult<SettlementCalculation> {
        let report = self
            .collaborators
            .quality
            .get_reading(period, supplier_code)?
            .ok_or_else(|| SettlementError::QualityReadingNotFound {
                period: period.to_string(),
                supplier_code: supplier_code.to_string(),
            })?;
        self.compute_settlement_for_reading(&report)
    }

    /// Computes the settlement described by one lab report.
    ///
    /// Identical collaborator data always yields an identical record.
    pub fn compute_settlement_for_reading(
        &self,
        report: &LabReport,
    ) -> SettlementResult<SettlementCalculation> {
        let started = Instant::now();
        let supplier = self
            .collaborators
            .suppliers
            .get_supplier(&report.supplier_code)?;
        let reading = QualityReading::try_from(report)?;
        let period = reading.period;
        let code = reading.supplier_code.as_str();
        let config = self.config.as_ref();

        let mut steps: Vec<AuditStep> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();
        let mut step_number: u32 = 1;

        let deliveries = self.collaborators.deliveries.list_deliveries(&period, code)?;
        debug!(
            supplier_code = code,
            period = %period,
            deliveries = deliveries.len(),
            "Fetched current-period deliveries"
        );
        let summary = summarize_deliveries(&deliveries, config.days_per_period, step_number);
        steps.push(summary.audit_step);
        step_number += 1;

        let prior_period = period.previous();
        let prior_deliveries = self
            .collaborators
            .deliveries
            .list_deliveries(&prior_period, code)?;
        let prior_kilos = if prior_deliveries.is_empty() {
            warn!(
                supplier_code = code,
                prior_period = %prior_period,
                "No prior-period deliveries; volume variation defaults to 0"
            );
            warnings.push(format!(
                "No deliveries in prior period {}; volume variation taken as 0",
                prior_period
            ));
            None
        } else {
            Some(total_kilos(&prior_deliveries))
        };
        let volume = calculate_volume_variation(summary.total_kilos, prior_kilos, step_number);
        steps.push(volume.audit_step);
        step_number += 1;

        let fat_variation =
            self.collaborators
                .quality
                .fat_variation(&period, code, reading.fat_percent)?;
        let solids_variation =
            self.collaborators
                .quality
                .solids_variation(&period, code, reading.solids_percent)?;

        let base = calculate_base_payments(
            &supplier.category,
            reading.fat_percent,
            reading.solids_percent,
            summary.total_kilos,
            step_number,
        );
        debug!(
            supplier_code = code,
            milk_payment = %base.milk_payment,
            fat_payment = %base.fat_payment,
            solids_payment = %base.solids_payment,
            "Base payments computed"
        );
        step_number += base.audit_steps.len() as u32;
        steps.extend(base.audit_steps);

        let bonus = calculate_frequency_bonus(
            &deliveries,
            base.milk_payment,
            config.shift_bonus_threshold,
            step_number,
        );
        steps.push(bonus.audit_step);
        step_number += 1;

        let gross_payment =
            base.milk_payment + base.fat_payment + base.solids_payment + bonus.bonus;
        steps.push(gross_step(
            step_number,
            base.milk_payment,
            base.fat_payment,
            base.solids_payment,
            bonus.bonus,
            gross_payment,
        ));
        step_number += 1;

        let deductions = calculate_variation_deductions(
            volume.variation,
            fat_variation,
            solids_variation,
            gross_payment,
            step_number,
        );
        let payment_after_deductions = gross_payment - deductions.total();
        debug!(
            supplier_code = code,
            volume_variation = %volume.variation,
            fat_variation = %fat_variation,
            solids_variation = %solids_variation,
            deductions = %deductions.total(),
            "Variation deductions computed"
        );
        step_number += deductions.audit_steps.len() as u32;
        steps.extend(deductions.audit_steps);

        let withholding = calculate_withholding(payment_after_deductions, config, step_number);
        steps.push(withholding.audit_step);

        let record = SettlementRecord {
            period,
            supplier_code: supplier.code,
            supplier_name: supplier.name,
            total_kilos: summary.total_kilos,
            delivery_days: summary.delivery_days,
            average_daily_kilos: summary.average_daily_kilos,
            volume_variation_percent: volume.variation,
            fat_percent: reading.fat_percent,
            fat_variation_percent: fat_variation,
            solids_percent: reading.solids_percent,
            solids_variation_percent: solids_variation,
            milk_payment: base.milk_payment,
            fat_payment: base.fat_payment,
            solids_payment: base.solids_payment,
            frequency_bonus: bonus.bonus,
            volume_variation_deduction: deductions.volume_deduction,
            fat_variation_deduction: deductions.fat_deduction,
            solids_variation_deduction: deductions.solids_deduction,
            gross_payment,
            payment_after_deductions,
            withholding: withholding.withholding,
            net_payment: withholding.net_payment,
        };

        let duration_us = started.elapsed().as_micros() as u64;
        info!(
            supplier_code = %record.supplier_code,
            period = %record.period,
            gross_payment = %record.gross_payment,
            net_payment = %record.net_payment,
            duration_us,
            "Settlement computed"
        );

        Ok(SettlementCalculation {
            record,
            audit_trace: AuditTrace {
                steps,
                warnings,
                duration_us,
            },
        })
    }
}

fn gross_step(
    step_number: u32,
    milk: Decimal,
    fat: Decimal,
    solids: Decimal,
    bonus: Decimal,
    gross: Decimal,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "gross_milk_payment".to_string(),
        rule_name: "Gross Milk Payment".to_string(),
        input: serde_json::json!({
            "milk_payment": milk.normalize().to_string(),
            "fat_payment": fat.normalize().to_string(),
            "solids_payment": solids.normalize().to_string(),
            "frequency_bonus": bonus.normalize().to_string()
        }),
        output: serde_json::json!({
            "gross_payment": gross.normalize().to_string()
        }),
        reasoning: format!(
            "${} + ${} + ${} + ${} = ${}",
            milk.normalize(),
            fat.normalize(),
            solids.normalize(),
            bonus.normalize(),
            gross.normalize()
        ),
    }
}
