//! HTTP request handlers for the attendance ledger API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::LedgerError;
use crate::models::AttendanceStatus;

use super::request::{
    CorrectTimesRequest, DateRangeQuery, EmployeeRequest, HolidayCreditRequest, TimestampRequest,
};
use super::response::{ApiError, ApiErrorResponse, StatusResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/employees/:employee_id", put(upsert_employee_handler))
        .route("/employees/:employee_id/clock-in", post(clock_in_handler))
        .route("/employees/:employee_id/status", get(status_handler))
        .route("/employees/:employee_id/attendance", get(list_records_handler))
        .route("/employees/:employee_id/summary", get(summary_handler))
        .route(
            "/employees/:employee_id/holiday-credit",
            post(holiday_credit_handler),
        )
        .route("/employees/:employee_id/billing", get(billing_handler))
        .route("/attendance/:record_id", get(get_record_handler))
        .route("/attendance/:record_id/breaks/start", post(start_break_handler))
        .route("/attendance/:record_id/breaks/end", post(end_break_handler))
        .route("/attendance/:record_id/clock-out", post(clock_out_handler))
        .route("/attendance/:record_id/times", put(correct_times_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: LedgerError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Unwraps a JSON body, turning rejections into 400 responses.
///
/// A request with no JSON content type is treated as an empty body when the
/// payload type has a default.
fn parse_body<T: Default>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(rejection_response(correlation_id, rejection)),
    }
}

/// Unwraps a JSON body that has no default.
fn require_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| rejection_response(correlation_id, rejection))
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
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
    json_response(StatusCode::BAD_REQUEST, error)
}

fn parse_query(
    correlation_id: Uuid,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<DateRangeQuery, Response> {
    query.map(|Query(q)| q).map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Invalid query string"
        );
        json_response(
            StatusCode::BAD_REQUEST,
            ApiError::invalid_query(rejection.body_text()),
        )
    })
}

fn parse_record_id(raw: &str) -> Result<Uuid, LedgerError> {
    Uuid::parse_str(raw)
        .map_err(|e| LedgerError::validation("record_id", format!("'{}' is not a UUID: {}", raw, e)))
}

/// Handler for `PUT /employees/:employee_id`.
async fn upsert_employee_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Processing employee upsert");

    let request = match require_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match state
        .ledger()
        .directory()
        .upsert_employee(request.into_employee(employee_id))
    {
        Ok(employee) => json_response(StatusCode::OK, employee),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for `POST /employees/:employee_id/clock-in`.
async fn clock_in_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<TimestampRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Processing clock-in");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let start_time = Instant::now();
    match state
        .ledger()
        .record_clock_in(&employee_id, request.at_or_now())
    {
        Ok(receipt) => {
            info!(
                correlation_id = %correlation_id,
                record_id = %receipt.record.id,
                is_primary = receipt.record.is_primary_clock_in,
                duration_us = start_time.elapsed().as_micros(),
                "Clock-in recorded"
            );
            json_response(StatusCode::CREATED, receipt)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for `POST /attendance/:record_id/breaks/start`.
async fn start_break_handler(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    payload: Result<Json<TimestampRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, record_id = %record_id, "Processing break start");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match parse_record_id(&record_id)
        .and_then(|id| state.ledger().start_break(id, request.at_or_now()))
    {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for `POST /attendance/:record_id/breaks/end`.
async fn end_break_handler(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    payload: Result<Json<TimestampRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, record_id = %record_id, "Processing break end");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match parse_record_id(&record_id)
        .and_then(|id| state.ledger().end_break(id, request.at_or_now()))
    {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for `POST /attendance/:record_id/clock-out`.
///
/// Responds 200 even when billing fails; the receipt carries the billing error.
async fn clock_out_handler(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    payload: Result<Json<TimestampRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, record_id = %record_id, "Processing clock-out");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let start_time = Instant::now();
    match parse_record_id(&record_id)
        .and_then(|id| state.ledger().clock_out(id, request.at_or_now()))
    {
        Ok(receipt) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %receipt.record.employee_id,
                total_income = %receipt.record.total_income,
                billed = receipt.billing.is_some(),
                duration_us = start_time.elapsed().as_micros(),
                "Clock-out recorded"
            );
            json_response(StatusCode::OK, receipt)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for `PUT /attendance/:record_id/times`.
async fn correct_times_handler(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    payload: Result<Json<CorrectTimesRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, record_id = %record_id, "Processing time correction");

    let request = match require_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match parse_record_id(&record_id).and_then(|id| {
        state
            .ledger()
            .correct_times(id, request.clock_in, request.clock_out)
    }) {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for `GET /attendance/:record_id`.
async fn get_record_handler(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    match parse_record_id(&record_id).and_then(|id| state.ledger().get_record(id)) {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for `GET /employees/:employee_id/status`.
async fn status_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    match state.ledger().open_record(&employee_id) {
        Ok(open_record) => json_response(
            StatusCode::OK,
            StatusResponse {
                status: open_record
                    .as_ref()
                    .map_or(AttendanceStatus::ClockedOut, |r| r.status),
                employee_id,
                open_record,
            },
        ),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for `GET /employees/:employee_id/attendance?from=&to=`.
async fn list_records_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let range = match parse_query(correlation_id, query) {
        Ok(range) => range,
        Err(response) => return response,
    };

    match state
        .ledger()
        .list_records(&employee_id, range.from, range.to)
    {
        Ok(records) => json_response(StatusCode::OK, records),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for `GET /employees/:employee_id/summary?from=&to=`.
async fn summary_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let range = match parse_query(correlation_id, query) {
        Ok(range) => range,
        Err(response) => return response,
    };

    match state.ledger().summarize(&employee_id, range.from, range.to) {
        Ok(summary) => json_response(StatusCode::OK, summary),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for `POST /employees/:employee_id/holiday-credit`.
async fn holiday_credit_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<HolidayCreditRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Processing holiday credit");

    let request = match require_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match state.ledger().credit_holiday(&employee_id, request.date) {
        Ok(receipt) => json_response(StatusCode::CREATED, receipt),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for `GET /employees/:employee_id/billing`.
async fn billing_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    match state.ledger().directory().employee(&employee_id) {
        Ok(_) => json_response(StatusCode::OK, state.billing().records_for(&employee_id)),
        Err(err) => error_response(correlation_id, err),
    }
}
