//! Employee model.
//!
//! Employees are owned by an external directory; the ledger reads their day
//! rate, optional scheduled start time and assigned lateness rules.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// The number of hours in a standard working day.
///
/// Hourly figures are derived from the day rate by dividing by this value.
pub const STANDARD_HOURS_PER_DAY: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Represents an employee whose attendance is recorded by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Pay for one standard working day.
    pub per_day_rate: Decimal,
    /// Individual scheduled start time, overriding the global default.
    #[serde(default)]
    pub scheduled_start_time: Option<NaiveTime>,
    /// Ids of the lateness rules assigned to this employee, in priority order.
    #[serde(default)]
    pub lateness_rules: Vec<String>,
}

impl Employee {
    /// Checks the employee's own fields.
    ///
    /// Rule references are checked by the directory, which knows the rule set.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.id.trim().is_empty() {
            return Err(LedgerError::validation("employee.id", "must not be empty"));
        }
        if self.per_day_rate < Decimal::ZERO {
            return Err(LedgerError::validation(
                "per_day_rate",
                format!(
                    "employee '{}' has negative day rate {}",
                    self.id, self.per_day_rate
                ),
            ));
        }
        Ok(())
    }
}
