//! HTTP request handlers for the settlement API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::SettlementError;
use crate::models::Period;
use crate::sources::SettlementStore;

use super::request::ComputeSettlementRequest;
use super::response::{ApiError, ApiErrorResponse, PreviousPeriodResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/settlements", get(list_settlements_handler))
        .route("/settlements/recompute", post(recompute_handler))
        .route("/settlements/compute", post(compute_handler))
        .route(
            "/periods/:year/:month/:half/previous",
            get(previous_period_handler),
        )
        .with_state(state)
}

fn json_ok<T: serde::Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Handler for GET /settlements.
///
/// Returns the last computed snapshot, or 204 when nothing has been computed.
async fn list_settlements_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.engine().store().list() {
        Ok(records) if records.is_empty() => {
            info!(correlation_id = %correlation_id, "No settlements stored");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(records) => {
            info!(
                correlation_id = %correlation_id,
                count = records.len(),
                "Listing settlements"
            );
            json_ok(records)
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Could not read settlements");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /settlements/recompute.
///
/// Runs the batch on the blocking pool and returns its report.
async fn recompute_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing recompute request");

    // The batch is synchronous; keep it off the async workers
    let engine = state.engine_handle();
    let outcome = tokio::task::spawn_blocking(move || engine.compute_all_pending()).await;

    match outcome {
        Ok(Ok(report)) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %report.run_id,
                computed = report.computed,
                failed = report.failures.len(),
                "Recompute completed"
            );
            json_ok(report)
        }
        Ok(Err(err)) => {
            warn!(correlation_id = %correlation_id, error = %err, "Recompute failed");
            ApiErrorResponse::from(err).into_response()
        }
        Err(join_err) => {
            error!(correlation_id = %correlation_id, error = %join_err, "Recompute task aborted");
            ApiErrorResponse::from(SettlementError::CalculationError {
                message: join_err.to_string(),
            })
            .into_response()
        }
    }
}

/// Handler for POST /settlements/compute.
///
/// Computes one supplier's settlement with its audit trace. Nothing is stored.
async fn compute_handler(
    State(state): State<AppState>,
    payload: Result<Json<ComputeSettlementRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing compute request");

    // Handle JSON parsing errors
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // serde's message names the offending field
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else if body_text.contains("period") {
                        // Period strings are validated while deserializing
                        ApiError::new("INVALID_PERIOD", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return ApiErrorResponse::bad_request(error).into_response();
        }
    };

    // Compute without persisting
    match state
        .engine()
        .compute_settlement(&request.period, &request.supplier_code)
    {
        Ok(calculation) => {
            info!(
                correlation_id = %correlation_id,
                supplier_code = %request.supplier_code,
                period = %request.period,
                net_payment = %calculation.record.net_payment,
                duration_us = calculation.audit_trace.duration_us,
                "Settlement computed"
            );
            json_ok(calculation)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                supplier_code = %request.supplier_code,
                period = %request.period,
                error = %err,
                "Settlement failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /periods/{year}/{month}/{half}/previous.
async fn previous_period_handler(
    Path((year, month, half)): Path<(String, String, String)>,
) -> Response {
    match format!("{}/{}/{}", year, month, half).parse::<Period>() {
        Ok(period) => json_ok(PreviousPeriodResponse {
            period,
            previous: period.previous(),
        }),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettlementConfig;
    use crate::engine::{Collaborators, SettlementEngine};
    use crate::models::{Category, DeliveryRecord, LabReport, Shift, SupplierProfile};
    use crate::sources::{Dataset, InMemorySources};
    use axum::{body::Body, http::Request};
    use chrono::NaiveDate;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let deliveries = (1..=12)
            .map(|day| DeliveryRecord {
                date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
                shift: Shift::Morning,
                supplier_code: "01001".to_string(),
                kilos: 100,
            })
            .collect();
        let dataset = Dataset {
            suppliers: vec![SupplierProfile {
                code: "01001".to_string(),
                name: "Los Alamos".to_string(),
                category: Category::A,
                retention: false,
            }],
            deliveries,
            lab_reports: vec![LabReport {
                supplier_code: "01001".to_string(),
                period: "2024/03/Q1".to_string(),
                fat_percent: "20".to_string(),
                solids_percent: "19".to_string(),
            }],
        };
        AppState::new(SettlementEngine::new(
            SettlementConfig::default(),
            Collaborators::in_memory(InMemorySources::new(dataset)),
        ))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn compute_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/settlements/compute")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_api_001_empty_store_returns_204() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(Request::get("/settlements").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_api_002_compute_returns_record_and_trace() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(compute_request(
                r#"{"period":"2024/03/Q1","supplier_code":"01001"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        // 1200 × 700 + 1200 × 30 + 1200 × 95, plus 12% of the milk payment
        let gross: rust_decimal::Decimal = json["record"]["gross_payment"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(gross, rust_decimal::Decimal::from(1_090_800));
        assert!(json["audit_trace"]["steps"].as_array().unwrap().len() > 5);
    }

    #[tokio::test]
    async fn test_api_003_missing_field_is_validation_error() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(compute_request(r#"{"period":"2024/03/Q1"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_api_004_unknown_reading_returns_404() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(compute_request(
                r#"{"period":"2024/04/Q2","supplier_code":"01001"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "QUALITY_READING_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_api_005_previous_period() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::get("/periods/2024/01/Q1/previous")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["previous"], "2023/12/Q2");
    }

    #[tokio::test]
    async fn test_api_006_previous_period_rejects_bad_half() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::get("/periods/2024/01/Q3/previous")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_PERIOD");
    }

    #[tokio::test]
    async fn test_api_007_previous_period_rejects_out_of_range_year() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::get("/periods/-2147483648/01/Q1/previous")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "INVALID_PERIOD");
        assert!(json["message"].as_str().unwrap().contains("year"));
    }
}
