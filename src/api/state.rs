//! Application state for the settlement API.

use std::sync::Arc;

use crate::engine::SettlementEngine;

/// Shared application state.
///
/// Holds the settlement engine, which every handler uses.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<SettlementEngine>,
}

impl AppState {
    /// Creates a new application state around the given engine.
    pub fn new(engine: SettlementEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns a reference to the engine.
    pub fn engine(&self) -> &SettlementEngine {
        &self.engine
    }

    /// Returns a shared handle to the engine, for blocking tasks.
    pub fn engine_handle(&self) -> Arc<SettlementEngine> {
        Arc::clone(&self.engine)
    }
}
