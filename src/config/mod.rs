//! Configuration loading and management for the settlement engine.
//!
//! The withholding rate and threshold, the averaging divisor and the shift
//! bonus threshold are loaded once per process from `settlement.yaml` and
//! shared by the engine and the HTTP layer.
//!
//! # Example
//!
//! ```no_run
//! use quincena_settlement::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap().into_config();
//! println!("Threshold: {}", config.withholding_threshold);
//! ```

mod loader;
mod types;

pub(crate) use loader::load_yaml;
pub use loader::{CONFIG_FILE_NAME, ConfigLoader};
pub use types::{
    DEFAULT_DAYS_PER_PERIOD, DEFAULT_SHIFT_BONUS_THRESHOLD, DEFAULT_WITHHOLDING_RATE_PERCENT,
    DEFAULT_WITHHOLDING_THRESHOLD, SettlementConfig,
};
