//! Attendance records and break periods.
//!
//! An [`AttendanceRecord`] is created on clock-in and mutated on break start,
//! break end and clock-out. Its derived fields (`lateness`, `lateness_deduction`,
//! `total_hours`, `total_income`) are recomputed by the ledger before every write.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuditStep, HolidayRef, hms};

/// Current state of an attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Working.
    ClockedIn,
    /// On a break.
    OnBreak,
    /// Session finished.
    ClockedOut,
}

impl AttendanceStatus {
    /// Returns the snake_case name used in payloads and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::ClockedIn => "clocked_in",
            AttendanceStatus::OnBreak => "on_break",
            AttendanceStatus::ClockedOut => "clocked_out",
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A break taken during an attendance session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakPeriod {
    /// When the break started.
    pub start: DateTime<Utc>,
    /// When the break ended; `None` while the break is in progress.
    pub end: Option<DateTime<Utc>>,
}

impl BreakPeriod {
    /// Returns true while the break has no end.
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Returns the length of a closed break.
    pub fn duration(&self) -> Option<Duration> {
        self.end.map(|end| end - self.start)
    }
}

/// One clock-in event and everything derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier of the record.
    pub id: Uuid,
    /// The employee the record belongs to.
    pub employee_id: String,
    /// When the employee clocked in. `None` for holiday credits.
    pub clock_in_time: Option<DateTime<Utc>>,
    /// When the employee clocked out.
    pub clock_out_time: Option<DateTime<Utc>>,
    /// Current status.
    pub status: AttendanceStatus,
    /// Whether this is the employee's first clock-in of the day.
    pub is_primary_clock_in: bool,
    /// Whether lateness has been evaluated for this record.
    pub lateness_calculated: bool,
    /// How late the employee was, once evaluated.
    #[serde(with = "hms::option", default)]
    pub lateness: Option<Duration>,
    /// Pay deducted for lateness.
    pub lateness_deduction: Decimal,
    /// Worked hours net of breaks; `None` until both clock times exist.
    pub total_hours: Option<Decimal>,
    /// Income for this record.
    pub total_income: Decimal,
    /// The holiday the record falls on, if any.
    pub holiday: Option<HolidayRef>,
    /// Breaks in the order they were taken.
    #[serde(default)]
    pub breaks: Vec<BreakPeriod>,
    /// Steps of the most recent recomputation.
    #[serde(default)]
    pub audit_trace: Vec<AuditStep>,
}

impl AttendanceRecord {
    /// Creates a freshly clocked-in record.
    pub fn clocked_in(employee_id: &str, now: DateTime<Utc>, is_primary_clock_in: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            clock_in_time: Some(now),
            clock_out_time: None,
            status: AttendanceStatus::ClockedIn,
            is_primary_clock_in,
            lateness_calculated: false,
            lateness: None,
            lateness_deduction: Decimal::ZERO,
            total_hours: None,
            total_income: Decimal::ZERO,
            holiday: None,
            breaks: Vec::new(),
            audit_trace: Vec::new(),
        }
    }

    /// Creates a closed record without a clock-in that credits a holiday.
    pub fn holiday_credit(employee_id: &str, holiday: HolidayRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            clock_in_time: None,
            clock_out_time: None,
            status: AttendanceStatus::ClockedOut,
            is_primary_clock_in: false,
            lateness_calculated: false,
            lateness: None,
            lateness_deduction: Decimal::ZERO,
            total_hours: None,
            total_income: Decimal::ZERO,
            holiday: Some(holiday),
            breaks: Vec::new(),
            audit_trace: Vec::new(),
        }
    }

    /// Returns true while the session has a clock-in and no clock-out.
    pub fn is_open(&self) -> bool {
        self.clock_in_time.is_some() && self.clock_out_time.is_none()
    }

    /// Returns the break currently in progress.
    pub fn open_break_mut(&mut self) -> Option<&mut BreakPeriod> {
        self.breaks.iter_mut().rev().find(|b| b.is_open())
    }

    /// The local calendar date the record belongs to.
    ///
    /// This is the clock-in date in `tz`, or the holiday date for credits.
    pub fn work_date(&self, tz: Tz) -> Option<NaiveDate> {
        self.clock_in_time
            .map(|t| t.with_timezone(&tz).date_naive())
            .or_else(|| self.holiday.as_ref().map(|h| h.date))
    }
}
