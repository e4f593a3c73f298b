//! HTTP API module for the attendance ledger.
//!
//! This module exposes the ledger service as JSON endpoints for clocking in
//! and out, breaks, corrections, holiday credits and reporting.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CorrectTimesRequest, DateRangeQuery, EmployeeRequest, HolidayCreditRequest, TimestampRequest,
};
pub use response::{ApiError, ApiErrorResponse, StatusResponse};
pub use state::AppState;
