//! Quincena settlement engine for raw-milk suppliers.
//!
//! This crate computes each supplier's biweekly payment from delivered volume,
//! lab-measured fat and total solids, delivery frequency and period-to-period
//! variation, then applies withholding tax. Every computed settlement carries
//! an audit trace of the rules that produced it.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod sources;
