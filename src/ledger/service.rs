//! The attendance ledger service.
//!
//! [`AttendanceLedger`] owns the clock-in, break and clock-out lifecycle of
//! attendance records. Every mutation runs under the employee's lock: the state
//! check, recomputation of derived fields and the write happen on a copy of the
//! record that is stored only when the whole step succeeds.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::{AttendanceStore, BillingLedger, Directory};
use crate::calculation::{CalculationContext, LatenessOutcome, RecomputeMode, recompute};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AttendanceRecord, AttendanceStatus, BillingEntry, BillingRecord, BreakPeriod, PaymentType,
};

/// The result of a clock-in.
#[derive(Debug, Clone, Serialize)]
pub struct ClockInReceipt {
    /// The stored record.
    pub record: AttendanceRecord,
    /// What the lateness pass concluded.
    pub lateness: Option<LatenessOutcome>,
}

/// The result of a completed attendance cycle.
///
/// Billing runs after the attendance write. When it fails, `billing` is `None`,
/// `billing_error` says why, and the attendance record stays stored.
#[derive(Debug, Clone, Serialize)]
pub struct ClockOutReceipt {
    /// The stored record.
    pub record: AttendanceRecord,
    /// The billing record, when billing succeeded.
    pub billing: Option<BillingRecord>,
    /// The billing failure, when billing failed.
    pub billing_error: Option<String>,
}

/// Totals over an employee's records in a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSummary {
    /// The employee.
    pub employee_id: String,
    /// First local date included, if bounded.
    pub from: Option<NaiveDate>,
    /// Last local date included, if bounded.
    pub to: Option<NaiveDate>,
    /// Number of records.
    pub records: usize,
    /// Sum of worked hours.
    pub total_hours: Decimal,
    /// Sum of income.
    pub total_income: Decimal,
    /// Sum of lateness deductions.
    pub total_deduction: Decimal,
    /// Days with a recorded lateness.
    pub late_days: usize,
    /// Days that fell on a holiday.
    pub holiday_days: usize,
}

/// Records attendance and keeps every record's derived pay fields current.
pub struct AttendanceLedger {
    directory: Directory,
    store: AttendanceStore,
    billing: Arc<dyn BillingLedger>,
}

impl AttendanceLedger {
    /// Creates a ledger over the given reference data and billing sink.
    pub fn new(directory: Directory, billing: Arc<dyn BillingLedger>) -> Self {
        Self {
            directory,
            store: AttendanceStore::new(),
            billing,
        }
    }

    /// Returns the reference data.
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Clocks an employee in.
    ///
    /// The record is primary when the employee has no primary record on the
    /// local date of `now` yet. Primary records get lateness evaluated
    /// immediately.
    ///
    /// # Errors
    ///
    /// - `EmployeeNotFound` for an unknown employee
    /// - `InvalidTransition` when the employee already has an open session or
    ///   a holiday credit on that date
    pub fn record_clock_in(
        &self,
        employee_id: &str,
        now: DateTime<Utc>,
    ) -> LedgerResult<ClockInReceipt> {
        let employee = self.directory.employee(employee_id)?;
        let tz = self.directory.settings().time_zone;
        let date = now.with_timezone(&tz).date_naive();

        self.store.with_employee_lock(employee_id, || {
            let existing = self.store.for_employee(employee_id);
            if let Some(open) = existing.iter().find(|r| r.is_open()) {
                return Err(LedgerError::invalid_transition(
                    "clock_in",
                    format!("employee already has open record {}", open.id),
                ));
            }

            if existing
                .iter()
                .any(|r| r.clock_in_time.is_none() && r.work_date(tz) == Some(date))
            {
                return Err(LedgerError::invalid_transition(
                    "clock_in",
                    format!("holiday already credited on {}", date),
                ));
            }

            let is_primary = !existing
                .iter()
                .any(|r| r.is_primary_clock_in && r.work_date(tz) == Some(date));

            let mut record = AttendanceRecord::clocked_in(employee_id, now, is_primary);
            let result = recompute(
                &mut record,
                &self.directory.context(&employee),
                RecomputeMode::Full,
            );
            self.store.put(record.clone());

            info!(
                record_id = %record.id,
                employee_id = %employee_id,
                is_primary,
                lateness = ?result.lateness,
                "Clocked in"
            );

            Ok(ClockInReceipt {
                record,
                lateness: result.lateness,
            })
        })
    }

    /// Starts a break.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the record is `clocked_in`.
    pub fn start_break(&self, record_id: Uuid, now: DateTime<Utc>) -> LedgerResult<AttendanceRecord> {
        let (record, _) = self.mutate(record_id, |record, ctx| {
            if record.status != AttendanceStatus::ClockedIn {
                return Err(LedgerError::invalid_transition(
                    "start_break",
                    format!("record is {}, not clocked_in", record.status),
                ));
            }
            ensure_not_before("now", now, record.clock_in_time, "clock-in")?;

            record.breaks.push(BreakPeriod {
                start: now,
                end: None,
            });
            record.status = AttendanceStatus::OnBreak;
            Ok(recompute(record, ctx, RecomputeMode::HoursAndIncome))
        })?;

        info!(record_id = %record.id, employee_id = %record.employee_id, "Break started");
        Ok(record)
    }

    /// Ends the open break and refreshes hours and income.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the record is `on_break` with an open break.
    pub fn end_break(&self, record_id: Uuid, now: DateTime<Utc>) -> LedgerResult<AttendanceRecord> {
        let (record, _) = self.mutate(record_id, |record, ctx| {
            if record.status != AttendanceStatus::OnBreak {
                return Err(LedgerError::invalid_transition(
                    "end_break",
                    format!("record is {}, not on_break", record.status),
                ));
            }
            let open = record.open_break_mut().ok_or_else(|| {
                LedgerError::invalid_transition("end_break", "record has no open break")
            })?;
            ensure_not_before("now", now, Some(open.start), "break start")?;
            open.end = Some(now);

            record.status = AttendanceStatus::ClockedIn;
            Ok(recompute(record, ctx, RecomputeMode::HoursAndIncome))
        })?;

        info!(
            record_id = %record.id,
            employee_id = %record.employee_id,
            total_hours = ?record.total_hours,
            "Break ended"
        );
        Ok(record)
    }

    /// Clocks a record out, recomputes it and bills the result.
    ///
    /// A break still in progress is closed at `now`.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` when the record was never clocked in or is already
    /// clocked out.
    pub fn clock_out(&self, record_id: Uuid, now: DateTime<Utc>) -> LedgerResult<ClockOutReceipt> {
        let (record, result) = self.mutate(record_id, |record, ctx| {
            if record.clock_in_time.is_none() {
                return Err(LedgerError::invalid_transition(
                    "clock_out",
                    "record has no clock-in",
                ));
            }
            if record.clock_out_time.is_some() {
                return Err(LedgerError::invalid_transition(
                    "clock_out",
                    "record is already clocked out",
                ));
            }
            ensure_not_before("now", now, record.clock_in_time, "clock-in")?;

            if let Some(open) = record.open_break_mut() {
                ensure_not_before("now", now, Some(open.start), "break start")?;
                open.end = Some(now);
            }
            record.clock_out_time = Some(now);
            record.status = AttendanceStatus::ClockedOut;
            Ok(recompute(record, ctx, RecomputeMode::Full))
        })?;

        info!(
            record_id = %record.id,
            employee_id = %record.employee_id,
            total_hours = ?record.total_hours,
            total_income = %record.total_income,
            "Clocked out"
        );
        Ok(self.bill(record, result.payment_type))
    }

    /// Credits an employee for a holiday they did not work.
    ///
    /// Creates a clocked-out record without a clock-in for `date` and bills it
    /// as holiday pay. A non-working holiday pays the day rate; a special
    /// non-working holiday pays nothing.
    ///
    /// # Errors
    ///
    /// - `EmployeeNotFound` for an unknown employee
    /// - `Validation` when `date` is not a holiday
    /// - `InvalidTransition` when the employee already has a record on `date`
    pub fn credit_holiday(&self, employee_id: &str, date: NaiveDate) -> LedgerResult<ClockOutReceipt> {
        let employee = self.directory.employee(employee_id)?;
        let tz = self.directory.settings().time_zone;
        let holiday = self.directory.calendar().resolve(date).ok_or_else(|| {
            LedgerError::validation("date", format!("{} is not a holiday", date))
        })?;

        let (record, result) = self.store.with_employee_lock(employee_id, || {
            if self
                .store
                .for_employee(employee_id)
                .iter()
                .any(|r| r.work_date(tz) == Some(date))
            {
                return Err(LedgerError::invalid_transition(
                    "credit_holiday",
                    format!("employee already has attendance on {}", date),
                ));
            }

            let mut record = AttendanceRecord::holiday_credit(employee_id, holiday);
            let result = recompute(
                &mut record,
                &self.directory.context(&employee),
                RecomputeMode::Full,
            );
            self.store.put(record.clone());
            Ok((record, result))
        })?;

        info!(
            record_id = %record.id,
            employee_id = %employee_id,
            date = %date,
            total_income = %record.total_income,
            "Credited holiday"
        );
        Ok(self.bill(record, result.payment_type))
    }

    /// Corrects the clock times of a record and recomputes it.
    ///
    /// `None` keeps the stored time. Lateness is evaluated only if it has not
    /// been yet. Corrections are not billed again.
    ///
    /// # Errors
    ///
    /// - `Validation` when nothing is given, the clock-out precedes the
    ///   clock-in, a break falls outside the new times, or the clock-in moves
    ///   to another local date
    /// - `InvalidTransition` for holiday credits, or when setting a clock-out
    ///   on a record that is still open
    pub fn correct_times(
        &self,
        record_id: Uuid,
        clock_in: Option<DateTime<Utc>>,
        clock_out: Option<DateTime<Utc>>,
    ) -> LedgerResult<AttendanceRecord> {
        if clock_in.is_none() && clock_out.is_none() {
            return Err(LedgerError::validation("times", "nothing to correct"));
        }
        let tz = self.directory.settings().time_zone;

        let (record, _) = self.mutate(record_id, |record, ctx| {
            let Some(current_in) = record.clock_in_time else {
                return Err(LedgerError::invalid_transition(
                    "correct_times",
                    "holiday credits have no clock times",
                ));
            };
            if clock_out.is_some() && record.clock_out_time.is_none() {
                return Err(LedgerError::invalid_transition(
                    "correct_times",
                    "record is still open, clock out first",
                ));
            }

            let new_in = clock_in.unwrap_or(current_in);
            if new_in.with_timezone(&tz).date_naive() != current_in.with_timezone(&tz).date_naive() {
                return Err(LedgerError::validation(
                    "clock_in",
                    "a correction may not move a record to another day",
                ));
            }
            let new_out = clock_out.or(record.clock_out_time);
            if let Some(out) = new_out {
                ensure_not_before("clock_out", out, Some(new_in), "clock-in")?;
            }
            for period in &record.breaks {
                if period.start < new_in {
                    return Err(LedgerError::validation(
                        "clock_in",
                        format!("a break starts at {} before the clock-in", period.start),
                    ));
                }
                let period_end = period.end.unwrap_or(period.start);
                if new_out.is_some_and(|out| period_end > out) {
                    return Err(LedgerError::validation(
                        "clock_out",
                        format!("a break ends at {} after the clock-out", period_end),
                    ));
                }
            }

            record.clock_in_time = Some(new_in);
            record.clock_out_time = new_out;
            Ok(recompute(record, ctx, RecomputeMode::Full))
        })?;

        info!(
            record_id = %record.id,
            employee_id = %record.employee_id,
            total_hours = ?record.total_hours,
            total_income = %record.total_income,
            "Corrected attendance times"
        );
        Ok(record)
    }

    /// Returns a record by id.
    pub fn get_record(&self, record_id: Uuid) -> LedgerResult<AttendanceRecord> {
        self.store
            .get(record_id)
            .ok_or_else(|| LedgerError::RecordNotFound {
                id: record_id.to_string(),
            })
    }

    /// Returns the employee's open session, if any.
    pub fn open_record(&self, employee_id: &str) -> LedgerResult<Option<AttendanceRecord>> {
        self.directory.employee(employee_id)?;
        Ok(self.store.open_for(employee_id))
    }

    /// Returns the status of the employee's open session, or `clocked_out`.
    pub fn current_status(&self, employee_id: &str) -> LedgerResult<AttendanceStatus> {
        Ok(self
            .open_record(employee_id)?
            .map_or(AttendanceStatus::ClockedOut, |r| r.status))
    }

    /// Lists an employee's records whose local date lies in `[from, to]`,
    /// newest first.
    pub fn list_records(
        &self,
        employee_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> LedgerResult<Vec<AttendanceRecord>> {
        self.directory.employee(employee_id)?;
        let tz = self.directory.settings().time_zone;

        let mut records: Vec<AttendanceRecord> = self
            .store
            .for_employee(employee_id)
            .into_iter()
            .filter(|r| {
                r.work_date(tz).is_some_and(|date| {
                    from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
                })
            })
            .collect();
        records.sort_by_key(|r| Reverse((r.work_date(tz), r.clock_in_time)));
        Ok(records)
    }

    /// Totals an employee's records whose local date lies in `[from, to]`.
    pub fn summarize(
        &self,
        employee_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> LedgerResult<AttendanceSummary> {
        let records = self.list_records(employee_id, from, to)?;
        let tz = self.directory.settings().time_zone;

        let late_days: BTreeSet<NaiveDate> = records
            .iter()
            .filter(|r| r.lateness.is_some_and(|l| l > Duration::zero()))
            .filter_map(|r| r.work_date(tz))
            .collect();
        let holiday_days: BTreeSet<NaiveDate> = records
            .iter()
            .filter_map(|r| r.holiday.as_ref().map(|h| h.date))
            .collect();

        Ok(AttendanceSummary {
            employee_id: employee_id.to_string(),
            from,
            to,
            records: records.len(),
            total_hours: records.iter().filter_map(|r| r.total_hours).sum(),
            total_income: records.iter().map(|r| r.total_income).sum(),
            total_deduction: records.iter().map(|r| r.lateness_deduction).sum(),
            late_days: late_days.len(),
            holiday_days: holiday_days.len(),
        })
    }

    /// Applies `f` to a copy of the record under the employee's lock and
    /// stores the copy only when `f` succeeds.
    fn mutate<T>(
        &self,
        record_id: Uuid,
        f: impl FnOnce(&mut AttendanceRecord, &CalculationContext<'_>) -> LedgerResult<T>,
    ) -> LedgerResult<(AttendanceRecord, T)> {
        let employee_id = self.get_record(record_id)?.employee_id;
        let employee = self.directory.employee(&employee_id)?;

        self.store.with_employee_lock(&employee_id, || {
            let mut record = self.get_record(record_id)?;
            let out = f(&mut record, &self.directory.context(&employee))?;
            self.store.put(record.clone());
            Ok((record, out))
        })
    }

    fn bill(&self, record: AttendanceRecord, payment_type: PaymentType) -> ClockOutReceipt {
        let tz = self.directory.settings().time_zone;
        let date = record
            .work_date(tz)
            .unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive());

        let entry = BillingEntry {
            employee_id: record.employee_id.clone(),
            attendance_id: record.id,
            date,
            total_income: record.total_income,
            hours_worked: record.total_hours,
            payment_type,
        };

        match self.billing.record(entry) {
            Ok(billing) => ClockOutReceipt {
                record,
                billing: Some(billing),
                billing_error: None,
            },
            Err(e) => {
                warn!(
                    record_id = %record.id,
                    employee_id = %record.employee_id,
                    error = %e,
                    "Billing failed, attendance kept"
                );
                ClockOutReceipt {
                    record,
                    billing: None,
                    billing_error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Rejects `value` when it lies before `bound`.
fn ensure_not_before(
    field: &str,
    value: DateTime<Utc>,
    bound: Option<DateTime<Utc>>,
    bound_name: &str,
) -> LedgerResult<()> {
    match bound {
        Some(bound) if value < bound => Err(LedgerError::validation(
            field,
            format!("{} is before the {} at {}", value.to_rfc3339(), bound_name, bound.to_rfc3339()),
        )),
        _ => Ok(()),
    }
}
