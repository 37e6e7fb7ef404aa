//! HTTP server for the quincena settlement engine.
//!
//! Environment:
//! - `SETTLEMENT_CONFIG_DIR`: directory holding `settlement.yaml` (default `./config`)
//! - `SETTLEMENT_DATA_FILE`: YAML dataset of suppliers, deliveries and lab reports
//!   (default `./config/dataset.yaml`)
//! - `SETTLEMENT_ADDR`: listen address (default `0.0.0.0:8080`)
//! - `RUST_LOG`: log filter (default `info`)

use std::env;
use std::error::Error;

use tracing::info;

use quincena_settlement::api::{AppState, create_router};
use quincena_settlement::config::ConfigLoader;
use quincena_settlement::engine::{Collaborators, SettlementEngine};
use quincena_settlement::logging;
use quincena_settlement::sources::InMemorySources;

const DEFAULT_CONFIG_DIR: &str = "./config";
const DEFAULT_DATA_FILE: &str = "./config/dataset.yaml";
const DEFAULT_ADDR: &str = "0.0.0.0:8080";

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let config_dir = env_or("SETTLEMENT_CONFIG_DIR", DEFAULT_CONFIG_DIR);
    let data_file = env_or("SETTLEMENT_DATA_FILE", DEFAULT_DATA_FILE);
    let addr = env_or("SETTLEMENT_ADDR", DEFAULT_ADDR);

    let config = ConfigLoader::load(&config_dir)?.into_config();
    info!(
        config_dir = %config_dir,
        withholding_rate_percent = %config.withholding_rate_percent,
        withholding_threshold = %config.withholding_threshold,
        "Configuration loaded"
    );

    let sources = InMemorySources::load(&data_file)?;
    info!(
        data_file = %data_file,
        suppliers = sources.dataset().suppliers.len(),
        deliveries = sources.dataset().deliveries.len(),
        lab_reports = sources.dataset().lab_reports.len(),
        "Dataset loaded"
    );

    let engine = SettlementEngine::new(config, Collaborators::in_memory(sources));
    let router = create_router(AppState::new(engine));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Listening");
    axum::serve(listener, router).await?;

    Ok(())
}
