//! Settlement assembly and batch recomputation.
//!
//! [`SettlementEngine`] pulls a supplier's deliveries, lab reading and profile
//! from its [`Collaborators`], runs the calculation pipeline, and returns a
//! [`SettlementCalculation`](crate::models::SettlementCalculation) with its
//! audit trace. [`SettlementEngine::compute_all_pending`] does the same for
//! every pending reading and replaces the stored snapshot.

mod assembler;
mod batch;

pub use assembler::{Collaborators, SettlementEngine};
pub use batch::{BatchFailure, BatchReport};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettlementConfig;
    use crate::error::{SettlementError, SettlementResult};
    use crate::models::{
        Category, DeliveryRecord, LabReport, Period, SettlementRecord, Shift, SupplierProfile,
    };
    use crate::sources::{Dataset, InMemorySources, QualitySource, SettlementStore};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Arc;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn period(s: &str) -> Period {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn supplier(code: &str, category: Category) -> SupplierProfile {
        SupplierProfile {
            code: code.to_string(),
            name: format!("Supplier {}", code),
            category,
            retention: false,
        }
    }

    fn report(code: &str, period: &str, fat: &str, solids: &str) -> LabReport {
        LabReport {
            supplier_code: code.to_string(),
            period: period.to_string(),
            fat_percent: fat.to_string(),
            solids_percent: solids.to_string(),
        }
    }

    fn deliveries(
        code: &str,
        year_month: &str,
        days: std::ops::RangeInclusive<u32>,
        shift: Shift,
        kilos: u32,
    ) -> Vec<DeliveryRecord> {
        days.map(|day| DeliveryRecord {
            date: date(&format!("{}-{:02}", year_month, day)),
            shift,
            supplier_code: code.to_string(),
            kilos,
        })
        .collect()
    }

    /// Category B supplier with a prior period on file:
    /// 1500 kg now versus 2000 kg before, fat 50 -> 46, solids 40 -> 36.
    fn declining_dataset() -> Dataset {
        let mut records = deliveries("01002", "2024-03", 1..=10, Shift::Morning, 76);
        records.extend(deliveries("01002", "2024-03", 11..=11, Shift::Morning, 80));
        records.extend(deliveries("01002", "2024-03", 1..=11, Shift::Evening, 60));
        records.extend(deliveries("01002", "2024-02", 16..=25, Shift::Morning, 200));
        Dataset {
            suppliers: vec![supplier("01002", Category::B)],
            deliveries: records,
            lab_reports: vec![
                report("01002", "2024/02/Q2", "50", "40"),
                report("01002", "2024/03/Q1", "46", "36"),
            ],
        }
    }

    fn engine(dataset: Dataset) -> SettlementEngine {
        SettlementEngine::new(
            SettlementConfig::default(),
            Collaborators::in_memory(InMemorySources::new(dataset)),
        )
    }

    // ==========================================================================
    // SA-001: full pipeline with prior-period data
    // ==========================================================================
    #[test]
    fn test_sa_001_declining_supplier_full_settlement() {
        let calc = engine(declining_dataset())
            .compute_settlement(&period("2024/03/Q1"), "01002")
            .unwrap();
        let r = &calc.record;

        assert_eq!(r.total_kilos, dec("1500"));
        assert_eq!(r.delivery_days, 11);
        assert_eq!(r.average_daily_kilos, dec("100"));
        assert_eq!(r.volume_variation_percent, dec("25"));
        assert_eq!(r.fat_variation_percent, dec("8"));
        assert_eq!(r.solids_variation_percent, dec("10"));

        assert_eq!(r.milk_payment, dec("825000"));
        assert_eq!(r.fat_payment, dec("180000"));
        assert_eq!(r.solids_payment, dec("225000"));
        assert_eq!(r.frequency_bonus, dec("165000"));
        assert_eq!(r.gross_payment, dec("1395000"));

        assert_eq!(r.volume_variation_deduction, dec("97650"));
        assert_eq!(r.fat_variation_deduction, Decimal::ZERO);
        assert_eq!(r.solids_variation_deduction, dec("251100"));
        assert_eq!(r.payment_after_deductions, dec("1046250"));
        assert_eq!(r.withholding, dec("136012.5"));
        assert_eq!(r.net_payment, dec("910237.5"));

        assert!(calc.audit_trace.warnings.is_empty());
    }

    // ==========================================================================
    // SA-002: audit steps are numbered consecutively from 1
    // ==========================================================================
    #[test]
    fn test_sa_002_audit_steps_numbered_in_order() {
        let calc = engine(declining_dataset())
            .compute_settlement(&period("2024/03/Q1"), "01002")
            .unwrap();
        for (i, step) in calc.audit_trace.steps.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }
        let last = calc.audit_trace.steps.last().unwrap();
        assert_eq!(last.rule_id, "withholding");
    }

    // ==========================================================================
    // SA-003: no prior period yields zero variations and a warning
    // ==========================================================================
    #[test]
    fn test_sa_003_no_prior_period_defaults_variation_to_zero() {
        let calc = engine(declining_dataset())
            .compute_settlement(&period("2024/02/Q2"), "01002")
            .unwrap();
        let r = &calc.record;
        assert_eq!(r.volume_variation_percent, Decimal::ZERO);
        assert_eq!(r.fat_variation_percent, Decimal::ZERO);
        assert_eq!(r.total_deductions(), Decimal::ZERO);
        // 2000 × 550 + 2000 × 120 + 2000 × 150, no bonus (10 mornings do not exceed 10)
        assert_eq!(r.gross_payment, dec("1640000"));
        assert_eq!(r.withholding, dec("213200"));
        assert_eq!(r.net_payment, dec("1426800"));
        assert_eq!(calc.audit_trace.warnings.len(), 1);
    }

    // ==========================================================================
    // SA-004: malformed lab value fails that settlement only
    // ==========================================================================
    #[test]
    fn test_sa_004_malformed_fat_reading() {
        let mut dataset = declining_dataset();
        dataset.lab_reports[1].fat_percent = "abc".to_string();
        match engine(dataset).compute_settlement(&period("2024/03/Q1"), "01002") {
            Err(SettlementError::MalformedInput { field, value }) => {
                assert_eq!(field, "fat_percent");
                assert_eq!(value, "abc");
            }
            other => panic!("Expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_sa_005_missing_reading() {
        let result = engine(declining_dataset()).compute_settlement(&period("2024/04/Q1"), "01002");
        assert!(matches!(
            result,
            Err(SettlementError::QualityReadingNotFound { .. })
        ));
    }

    #[test]
    fn test_sa_006_unknown_supplier() {
        let mut dataset = declining_dataset();
        dataset.lab_reports.push(report("09999", "2024/03/Q1", "20", "19"));
        let result = engine(dataset).compute_settlement(&period("2024/03/Q1"), "09999");
        assert!(matches!(result, Err(SettlementError::SupplierNotFound { .. })));
    }

    #[test]
    fn test_sa_010_supplier_resolved_before_reading_is_parsed() {
        let mut dataset = declining_dataset();
        dataset.lab_reports.push(report("09999", "2024/03/Q1", "abc", "19"));
        let engine = engine(dataset);
        let report = engine
            .quality()
            .get_reading(&period("2024/03/Q1"), "09999")
            .unwrap()
            .unwrap();
        let result = engine.compute_settlement_for_reading(&report);
        assert!(matches!(result, Err(SettlementError::SupplierNotFound { .. })));
    }

    #[test]
    fn test_sa_007_zero_deliveries_settles_to_zero() {
        let dataset = Dataset {
            suppliers: vec![supplier("01005", Category::C)],
            deliveries: vec![],
            lab_reports: vec![report("01005", "2024/03/Q1", "30", "20")],
        };
        let r = engine(dataset)
            .compute_settlement(&period("2024/03/Q1"), "01005")
            .unwrap()
            .record;
        assert_eq!(r.total_kilos, Decimal::ZERO);
        assert_eq!(r.delivery_days, 0);
        assert_eq!(r.gross_payment, Decimal::ZERO);
        assert_eq!(r.net_payment, Decimal::ZERO);
    }

    #[test]
    fn test_sa_008_unrecognized_category_pays_no_milk() {
        let mut dataset = declining_dataset();
        dataset.suppliers[0].category = Category::from("Z");
        let r = engine(dataset)
            .compute_settlement(&period("2024/03/Q1"), "01002")
            .unwrap()
            .record;
        assert_eq!(r.milk_payment, Decimal::ZERO);
        assert_eq!(r.frequency_bonus, Decimal::ZERO);
        assert_eq!(r.fat_payment, dec("180000"));
    }

    #[test]
    fn test_sa_009_settlement_is_deterministic() {
        let engine = engine(declining_dataset());
        let first = engine
            .compute_settlement(&period("2024/03/Q1"), "01002")
            .unwrap();
        let second = engine
            .compute_settlement(&period("2024/03/Q1"), "01002")
            .unwrap();
        assert_eq!(first.record, second.record);
        assert_eq!(first.audit_trace.steps, second.audit_trace.steps);
    }

    // ==========================================================================
    // BR: batch recomputation
    // ==========================================================================
    #[test]
    fn test_br_001_batch_skips_failures_and_replaces_snapshot() {
        let mut dataset = declining_dataset();
        dataset.suppliers.push(supplier("01003", Category::D));
        dataset.lab_reports.push(report("01003", "2024/03/Q1", "abc", "10"));
        let engine = engine(dataset);

        let report = engine.compute_all_pending().unwrap();
        assert_eq!(report.computed, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].supplier_code, "01003");
        assert!(report.failures[0].error.contains("fat_percent"));

        let stored = engine.store().list().unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|r| r.supplier_code == "01002"));
    }

    #[test]
    fn test_br_002_batch_is_idempotent() {
        let engine = engine(declining_dataset());
        engine.compute_all_pending().unwrap();
        let first = engine.store().list().unwrap();
        engine.compute_all_pending().unwrap();
        let second = engine.store().list().unwrap();
        assert_eq!(first, second);
    }

    struct BrokenQuality;

    impl QualitySource for BrokenQuality {
        fn list_readings(&self) -> SettlementResult<Vec<LabReport>> {
            Err(SettlementError::SourceUnavailable {
                source_name: "quality".to_string(),
                message: "connection refused".to_string(),
            })
        }

        fn get_reading(&self, _: &Period, _: &str) -> SettlementResult<Option<LabReport>> {
            Ok(None)
        }

        fn fat_variation(&self, _: &Period, _: &str, _: i32) -> SettlementResult<Decimal> {
            Ok(Decimal::ZERO)
        }

        fn solids_variation(&self, _: &Period, _: &str, _: i32) -> SettlementResult<Decimal> {
            Ok(Decimal::ZERO)
        }
    }

    #[test]
    fn test_br_003_listing_failure_fails_batch_and_keeps_snapshot() {
        let mut collaborators = Collaborators::in_memory(InMemorySources::new(declining_dataset()));
        let previous = SettlementEngine::new(SettlementConfig::default(), collaborators.clone())
            .compute_settlement(&period("2024/03/Q1"), "01002")
            .unwrap()
            .record;
        collaborators.store.replace_all(vec![previous.clone()]).unwrap();
        collaborators.quality = Arc::new(BrokenQuality);

        let engine = SettlementEngine::new(SettlementConfig::default(), collaborators);
        let result = engine.compute_all_pending();
        assert!(matches!(
            result,
            Err(SettlementError::SourceUnavailable { .. })
        ));
        let stored: Vec<SettlementRecord> = engine.store().list().unwrap();
        assert_eq!(stored, vec![previous]);
    }

    #[test]
    fn test_br_004_bundled_dataset_batch() {
        let engine = SettlementEngine::new(
            SettlementConfig::default(),
            Collaborators::in_memory(InMemorySources::load("./config/dataset.yaml").unwrap()),
        );
        let report = engine.compute_all_pending().unwrap();
        assert_eq!(report.computed, 3);
        assert_eq!(report.failures.len(), 1);
    }
}
