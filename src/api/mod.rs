//! HTTP API module for the settlement engine.
//!
//! This module exposes the stored settlements, batch recomputation, on-demand
//! settlement of a single supplier, and previous-period lookup.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::ComputeSettlementRequest;
pub use response::{ApiError, ApiErrorResponse, PreviousPeriodResponse};
pub use state::AppState;
