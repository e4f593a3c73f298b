//! Derived-field recomputation for attendance records.
//!
//! [`recompute`] is run on a record before every write. It resolves the
//! scheduled start, evaluates lateness once for primary clock-ins, and
//! refreshes worked hours and income so they always agree with the clock
//! times, breaks and holiday on the record.

use chrono::Duration;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{
    LatenessOutcome, SkipReason, calculate_income, calculate_worked_hours, evaluate_lateness,
    resolve_scheduled_start,
};
use crate::models::{
    AttendanceRecord, Employee, GlobalSettings, HolidayCalendar, LatenessRule, PaymentType,
};

/// Reference data needed to recompute one employee's records.
#[derive(Debug, Clone)]
pub struct CalculationContext<'a> {
    /// The employee who owns the record.
    pub employee: &'a Employee,
    /// The employee's lateness rules, in assignment order.
    pub rules: Vec<&'a LatenessRule>,
    /// Global settings.
    pub settings: &'a GlobalSettings,
    /// The holiday calendar.
    pub calendar: &'a HolidayCalendar,
}

/// Which derived fields a write refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeMode {
    /// Evaluate lateness (when still pending), then hours and income.
    Full,
    /// Hours and income only; lateness is left as stored.
    HoursAndIncome,
}

/// What a recomputation did.
#[derive(Debug, Clone, PartialEq)]
pub struct Recomputation {
    /// The lateness pass result; `None` when lateness was not considered.
    pub lateness: Option<LatenessOutcome>,
    /// Holiday or regular pay.
    pub payment_type: PaymentType,
}

/// Recomputes every derived field of `record` in place.
///
/// Lateness is evaluated only for primary clock-ins whose lateness has not
/// been calculated yet. Once evaluated (late or on time) the record is marked
/// calculated and later writes keep its lateness, deduction and holiday. When
/// the scheduled start cannot be resolved, lateness is zeroed and the record
/// stays pending. Non-primary records never carry lateness or a holiday.
pub fn recompute(
    record: &mut AttendanceRecord,
    ctx: &CalculationContext<'_>,
    mode: RecomputeMode,
) -> Recomputation {
    let mut steps = Vec::new();
    let mut step_number: u32 = 1;
    let tz = ctx.settings.time_zone;

    let scheduled = record.clock_in_time.and_then(|clock_in| {
        resolve_scheduled_start(ctx.employee, ctx.settings, clock_in, step_number)
    });
    if let Some(resolved) = &scheduled {
        steps.push(resolved.audit_step.clone());
        step_number += 1;
    }
    let scheduled_start = scheduled.as_ref().map(|s| s.scheduled_start);

    let lateness = match mode {
        RecomputeMode::HoursAndIncome => None,
        RecomputeMode::Full => Some(match record.clock_in_time {
            None => LatenessOutcome::ComputationSkipped {
                reason: SkipReason::NoClockIn,
            },
            Some(_) if !record.is_primary_clock_in => {
                record.lateness = None;
                record.lateness_deduction = Decimal::ZERO;
                record.holiday = None;
                LatenessOutcome::ComputationSkipped {
                    reason: SkipReason::NotPrimary,
                }
            }
            Some(_) if record.lateness_calculated => LatenessOutcome::ComputationSkipped {
                reason: SkipReason::AlreadyCalculated,
            },
            Some(clock_in) => {
                record.holiday = record
                    .work_date(tz)
                    .and_then(|date| ctx.calendar.resolve(date));

                match scheduled_start {
                    Some(start) => {
                        let evaluation = evaluate_lateness(
                            clock_in,
                            start,
                            &ctx.rules,
                            ctx.employee.per_day_rate,
                            step_number,
                        );
                        step_number = step_number.saturating_add(
                            u32::try_from(evaluation.audit_steps.len()).unwrap_or(u32::MAX),
                        );
                        steps.extend(evaluation.audit_steps);
                        record.lateness = Some(evaluation.lateness);
                        record.lateness_deduction = evaluation.deduction;
                        record.lateness_calculated = true;
                        evaluation.outcome
                    }
                    None => {
                        warn!(
                            record_id = %record.id,
                            employee_id = %record.employee_id,
                            "Scheduled start unresolved, lateness left at zero"
                        );
                        record.lateness = Some(Duration::zero());
                        record.lateness_deduction = Decimal::ZERO;
                        LatenessOutcome::ComputationSkipped {
                            reason: SkipReason::ScheduleUnresolved,
                        }
                    }
                }
            }
        }),
    };

    let hours = calculate_worked_hours(
        record.clock_in_time,
        record.clock_out_time,
        scheduled_start,
        &record.breaks,
        step_number,
    );
    record.total_hours = hours.hours;
    steps.push(hours.audit_step);
    step_number += 1;

    let income = calculate_income(
        ctx.employee.per_day_rate,
        record.total_hours,
        record.lateness_deduction,
        record.holiday.as_ref().map(|h| h.holiday_type),
        record.clock_in_time.is_some(),
        step_number,
    );
    record.total_income = income.total_income;
    steps.push(income.audit_step);

    record.audit_trace = steps;

    debug!(
        record_id = %record.id,
        employee_id = %record.employee_id,
        lateness = ?lateness,
        total_hours = ?record.total_hours,
        lateness_deduction = %record.lateness_deduction,
        total_income = %record.total_income,
        "Recomputed attendance record"
    );

    Recomputation {
        lateness,
        payment_type: income.payment_type,
    }
}
