//! HTTP request handlers for the Duty Roster Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::export::{ExportFormat, render, suggested_file_name};
use crate::models::{Schedule, SolveOutcome};

use super::request::RosterRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/roster", post(roster_handler))
        .route("/export/ics", post(export_ics_handler))
        .route("/export/csv", post(export_csv_handler))
        .with_state(state)
}

fn json_error(status: StatusCode, error: ApiError) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
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
    json_error(StatusCode::BAD_REQUEST, error)
}

/// Handler for POST /roster.
///
/// Solves the requested month. A solved month returns 200 with the
/// [`RosterResult`](crate::models::RosterResult); an unsolvable month 422
/// with any audit warnings; a solver timeout 504. While the engine runs as
/// many solver threads as [`AppState::max_solver_workers`] allows, requests
/// get 503 without starting another.
async fn roster_handler(
    State(state): State<AppState>,
    payload: Result<Json<RosterRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing roster request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let (year, month) = match request.period() {
        Ok(period) => period,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Invalid roster period");
            let api_error: ApiErrorResponse = err.into();
            return json_error(api_error.status, api_error.error);
        }
    };

    if state.solver_saturated() {
        let active = state.engine().active_workers();
        warn!(
            correlation_id = %correlation_id,
            active_workers = active,
            max_workers = state.max_solver_workers(),
            "Solver threads saturated, refusing roster request"
        );
        return json_error(StatusCode::SERVICE_UNAVAILABLE, ApiError::solver_busy(active));
    }

    let engine = state.engine();
    let start_time = Instant::now();
    let joined = tokio::task::spawn_blocking(move || engine.solve_month(year, month)).await;

    let result = match joined {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Roster solve failed"
            );
            let api_error: ApiErrorResponse = err.into();
            return json_error(api_error.status, api_error.error);
        }
        Err(join_error) => {
            warn!(
                correlation_id = %correlation_id,
                error = %join_error,
                "Roster solve task failed"
            );
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::internal("The roster solve did not complete"),
            );
        }
    };

    info!(
        correlation_id = %correlation_id,
        year,
        month,
        outcome = result.outcome.label(),
        duration_us = start_time.elapsed().as_micros() as u64,
        "Roster request finished"
    );

    match &result.outcome {
        SolveOutcome::Solved { .. } => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            Json(result),
        )
            .into_response(),
        SolveOutcome::Infeasible => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::no_solution(year, month)
                .with_warnings(result.audit_trace.warnings.clone()),
        ),
        SolveOutcome::TimedOut { limit_ms } => {
            json_error(StatusCode::GATEWAY_TIMEOUT, ApiError::solver_timeout(*limit_ms))
        }
        SolveOutcome::Cancelled => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, ApiError::cancelled())
        }
    }
}

/// Handler for POST /export/ics.
async fn export_ics_handler(
    State(state): State<AppState>,
    payload: Result<Json<Schedule>, JsonRejection>,
) -> Response {
    export_response(&state, payload, ExportFormat::Ical)
}

/// Handler for POST /export/csv.
async fn export_csv_handler(
    State(state): State<AppState>,
    payload: Result<Json<Schedule>, JsonRejection>,
) -> Response {
    export_response(&state, payload, ExportFormat::Csv)
}

fn export_response(
    state: &AppState,
    payload: Result<Json<Schedule>, JsonRejection>,
    format: ExportFormat,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let schedule = match payload {
        Ok(Json(schedule)) => schedule,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    match render(&schedule, state.config().export(), format) {
        Ok(bytes) => {
            info!(
                correlation_id = %correlation_id,
                format = format.extension(),
                entries = schedule.len(),
                "Schedule exported"
            );
            let disposition = format!(
                "attachment; filename=\"{}\"",
                suggested_file_name(&schedule, format)
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, format.content_type().to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Export failed");
            let api_error: ApiErrorResponse = err.into();
            json_error(api_error.status, api_error.error)
        }
    }
}
