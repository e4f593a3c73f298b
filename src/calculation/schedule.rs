//! Scheduled start resolution.
//!
//! This module determines when an employee was expected to start work on the
//! day of a clock-in: the employee's own start time, else the global default,
//! else 09:00, on the clock-in's local calendar date.

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{AuditStep, Employee, GlobalSettings, fallback_scheduled_start};

/// Where the scheduled start time came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleSource {
    /// The employee's individual start time.
    Employee,
    /// The global default start time.
    GlobalSettings,
    /// The built-in 09:00 fallback.
    Fallback,
}

/// The result of resolving a scheduled start, including the audit step.
#[derive(Debug, Clone)]
pub struct ScheduledStartResult {
    /// The scheduled start as an instant.
    pub scheduled_start: DateTime<Utc>,
    /// Which setting supplied the time of day.
    pub source: ScheduleSource,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
}

/// Picks the start time of day that applies to `employee`.
pub fn scheduled_time_of_day(
    employee: &Employee,
    settings: &GlobalSettings,
) -> (NaiveTime, ScheduleSource) {
    if let Some(time) = employee.scheduled_start_time {
        (time, ScheduleSource::Employee)
    } else if let Some(time) = settings.scheduled_start_time {
        (time, ScheduleSource::GlobalSettings)
    } else {
        (fallback_scheduled_start(), ScheduleSource::Fallback)
    }
}

/// Resolves the scheduled start for a clock-in.
///
/// The start time of day is combined with the clock-in's calendar date in the
/// business time zone. Returns `None` when that local time does not exist (a
/// daylight-saving gap); callers treat that as "no lateness".
///
/// # Examples
///
/// ```
/// use attendance_ledger::calculation::{ScheduleSource, resolve_scheduled_start};
/// use attendance_ledger::models::{Employee, GlobalSettings};
/// use chrono::{NaiveTime, TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: String::new(),
///     per_day_rate: Decimal::new(1000, 0),
///     scheduled_start_time: None,
///     lateness_rules: vec![],
/// };
/// let settings = GlobalSettings {
///     scheduled_start_time: NaiveTime::from_hms_opt(8, 0, 0),
///     time_zone: chrono_tz::Asia::Manila,
/// };
///
/// // 08:12 in Manila.
/// let clock_in = Utc.with_ymd_and_hms(2026, 3, 2, 0, 12, 0).unwrap();
/// let result = resolve_scheduled_start(&employee, &settings, clock_in, 1).unwrap();
/// assert_eq!(result.source, ScheduleSource::GlobalSettings);
/// assert_eq!(result.scheduled_start, Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap());
/// ```
pub fn resolve_scheduled_start(
    employee: &Employee,
    settings: &GlobalSettings,
    clock_in: DateTime<Utc>,
    step_number: u32,
) -> Option<ScheduledStartResult> {
    let tz = settings.time_zone;
    let (time_of_day, source) = scheduled_time_of_day(employee, settings);
    let local_date = clock_in.with_timezone(&tz).date_naive();

    let Some(local_start) = tz.from_local_datetime(&local_date.and_time(time_of_day)).earliest()
    else {
        warn!(
            employee_id = %employee.id,
            date = %local_date,
            time = %time_of_day,
            time_zone = %tz,
            "Scheduled start does not exist in local time, skipping"
        );
        return None;
    };

    let source_label = match source {
        ScheduleSource::Employee => "employee start time",
        ScheduleSource::GlobalSettings => "global scheduled start",
        ScheduleSource::Fallback => "default start",
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "scheduled_start".to_string(),
        rule_name: "Scheduled Start Resolution".to_string(),
        input: serde_json::json!({
            "employee_id": employee.id,
            "clock_in": clock_in.to_rfc3339(),
            "local_date": local_date.to_string(),
            "time_zone": tz.name(),
        }),
        output: serde_json::json!({
            "scheduled_start": local_start.to_rfc3339(),
            "source": source,
        }),
        reasoning: format!(
            "Using {} {} on {} ({})",
            source_label,
            time_of_day,
            local_date,
            tz.name()
        ),
    };

    Some(ScheduledStartResult {
        scheduled_start: local_start.with_timezone(&Utc),
        source,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::Tz;
    use rust_decimal::Decimal;

    fn employee(start: Option<NaiveTime>) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            name: "Test".to_string(),
            per_day_rate: Decimal::new(1000, 0),
            scheduled_start_time: start,
            lateness_rules: vec![],
        }
    }

    fn settings(start: Option<NaiveTime>, tz: Tz) -> GlobalSettings {
        GlobalSettings {
            scheduled_start_time: start,
            time_zone: tz,
        }
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_employee_override_wins() {
        let emp = employee(Some(time(19, 30)));
        let cfg = settings(Some(time(8, 0)), Tz::UTC);
        let clock_in = Utc.with_ymd_and_hms(2026, 3, 2, 19, 45, 0).unwrap();

        let result = resolve_scheduled_start(&emp, &cfg, clock_in, 1).unwrap();
        assert_eq!(result.source, ScheduleSource::Employee);
        assert_eq!(
            result.scheduled_start,
            Utc.with_ymd_and_hms(2026, 3, 2, 19, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_fallback_is_nine_am() {
        let emp = employee(None);
        let cfg = settings(None, Tz::UTC);
        let clock_in = Utc.with_ymd_and_hms(2026, 3, 2, 9, 3, 0).unwrap();

        let result = resolve_scheduled_start(&emp, &cfg, clock_in, 4).unwrap();
        assert_eq!(result.source, ScheduleSource::Fallback);
        assert_eq!(
            result.scheduled_start,
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
        );
        assert_eq!(result.audit_step.step_number, 4);
        assert_eq!(result.audit_step.rule_id, "scheduled_start");
    }

    #[test]
    fn test_uses_local_date_not_utc_date() {
        // 23:30 UTC on 1 March is 07:30 on 2 March in Manila (+08:00).
        let emp = employee(None);
        let cfg = settings(Some(time(7, 0)), chrono_tz::Asia::Manila);
        let clock_in = Utc.with_ymd_and_hms(2026, 3, 1, 23, 30, 0).unwrap();

        let result = resolve_scheduled_start(&emp, &cfg, clock_in, 1).unwrap();
        let local = result.scheduled_start.with_timezone(&chrono_tz::Asia::Manila);
        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(local.time(), time(7, 0));
    }

    #[test]
    fn test_daylight_saving_gap_returns_none() {
        // 02:30 does not exist in New York on 8 March 2026.
        let emp = employee(Some(time(2, 30)));
        let cfg = settings(None, chrono_tz::America::New_York);
        let clock_in = Utc.with_ymd_and_hms(2026, 3, 8, 12, 0, 0).unwrap();

        assert!(resolve_scheduled_start(&emp, &cfg, clock_in, 1).is_none());
    }
}
