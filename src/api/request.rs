//! Request types for the attendance ledger API.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Employee;

/// Body of the clock-in, break and clock-out endpoints.
///
/// `at` back-dates the event; without it the server clock is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimestampRequest {
    /// When the event happened.
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

impl TimestampRequest {
    /// Returns `at`, or the current time.
    pub fn at_or_now(&self) -> DateTime<Utc> {
        self.at.unwrap_or_else(Utc::now)
    }
}

/// Body of `PUT /attendance/:record_id/times`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectTimesRequest {
    /// Corrected clock-in, if changing.
    #[serde(default)]
    pub clock_in: Option<DateTime<Utc>>,
    /// Corrected clock-out, if changing.
    #[serde(default)]
    pub clock_out: Option<DateTime<Utc>>,
}

/// Body of `POST /employees/:employee_id/holiday-credit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayCreditRequest {
    /// The holiday being credited.
    pub date: NaiveDate,
}

/// Body of `PUT /employees/:employee_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Pay for a standard 8 hour day.
    pub per_day_rate: Decimal,
    /// Individual scheduled start time.
    #[serde(default)]
    pub scheduled_start_time: Option<NaiveTime>,
    /// Assigned lateness rule ids, in priority order.
    #[serde(default)]
    pub lateness_rules: Vec<String>,
}

impl EmployeeRequest {
    /// Builds the employee with the id taken from the path.
    pub fn into_employee(self, id: String) -> Employee {
        Employee {
            id,
            name: self.name,
            per_day_rate: self.per_day_rate,
            scheduled_start_time: self.scheduled_start_time,
            lateness_rules: self.lateness_rules,
        }
    }
}

/// Query string of the list and summary endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateRangeQuery {
    /// First local date included.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Last local date included.
    #[serde(default)]
    pub to: Option<NaiveDate>,
}
