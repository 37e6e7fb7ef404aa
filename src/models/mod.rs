//! Core data models for the settlement engine.
//!
//! This module contains all the domain models used throughout the engine.

mod delivery;
mod period;
mod quality;
mod settlement;
mod supplier;

pub use delivery::{DeliveryRecord, Shift};
pub use period::{FIRST_HALF_LAST_DAY, Half, Period};
pub use quality::{LabReport, QualityReading, parse_percent};
pub use settlement::{AuditStep, AuditTrace, SettlementCalculation, SettlementRecord};
pub use supplier::{Category, SupplierProfile};
