//! Worked hours calculation.
//!
//! Worked time runs from the later of the scheduled start and the actual
//! clock-in to the clock-out, minus closed breaks. Arriving early earns no
//! extra credited time.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{AuditStep, BreakPeriod, hms};

/// The result of a worked hours calculation, with its audit step.
#[derive(Debug, Clone)]
pub struct WorkedHoursResult {
    /// Worked hours rounded to 2 decimal places; `None` without both clock times.
    pub hours: Option<Decimal>,
    /// The start actually credited.
    pub effective_start: Option<DateTime<Utc>>,
    /// The audit step recording the calculation.
    pub audit_step: AuditStep,
}

/// Converts a duration to hours, rounded half-up to 2 decimal places.
///
/// ```
/// use attendance_ledger::calculation::duration_to_hours;
/// use chrono::Duration;
/// use rust_decimal::Decimal;
///
/// assert_eq!(duration_to_hours(Duration::minutes(470)), Decimal::new(783, 2)); // 7.83
/// assert_eq!(duration_to_hours(Duration::minutes(45)), Decimal::new(75, 2));
/// ```
pub fn duration_to_hours(duration: Duration) -> Decimal {
    (Decimal::from(duration.num_seconds()) / Decimal::from(3600))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Calculates worked hours for a record.
///
/// # Arguments
///
/// * `clock_in` / `clock_out` - The recorded clock times
/// * `scheduled_start` - The resolved scheduled start, if any
/// * `breaks` - All breaks; open breaks are skipped
/// * `step_number` - The step number for audit trail sequencing
///
/// The result is floored at zero.
///
/// # Examples
///
/// ```
/// use attendance_ledger::calculation::calculate_worked_hours;
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let scheduled = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
/// let early = Utc.with_ymd_and_hms(2026, 3, 2, 8, 30, 0).unwrap();
/// let out = Utc.with_ymd_and_hms(2026, 3, 2, 17, 0, 0).unwrap();
///
/// let result = calculate_worked_hours(Some(early), Some(out), Some(scheduled), &[], 1);
/// assert_eq!(result.hours, Some(Decimal::new(800, 2)));
/// ```
pub fn calculate_worked_hours(
    clock_in: Option<DateTime<Utc>>,
    clock_out: Option<DateTime<Utc>>,
    scheduled_start: Option<DateTime<Utc>>,
    breaks: &[BreakPeriod],
    step_number: u32,
) -> WorkedHoursResult {
    let (Some(clock_in), Some(clock_out)) = (clock_in, clock_out) else {
        return WorkedHoursResult {
            hours: None,
            effective_start: None,
            audit_step: AuditStep {
                step_number,
                rule_id: "worked_hours".to_string(),
                rule_name: "Worked Hours".to_string(),
                input: serde_json::json!({
                    "clock_in": clock_in.map(|t| t.to_rfc3339()),
                    "clock_out": clock_out.map(|t| t.to_rfc3339()),
                }),
                output: serde_json::json!({ "total_hours": null }),
                reasoning: "Worked hours need both a clock-in and a clock-out".to_string(),
            },
        };
    };

    let effective_start = scheduled_start.map_or(clock_in, |s| s.max(clock_in));
    let break_total = breaks
        .iter()
        .filter_map(BreakPeriod::duration)
        .fold(Duration::zero(), |acc, d| acc + d);
    let skipped_open = breaks.iter().filter(|b| b.is_open()).count();

    let worked = (clock_out - effective_start - break_total).max(Duration::zero());
    let hours = duration_to_hours(worked);

    WorkedHoursResult {
        hours: Some(hours),
        effective_start: Some(effective_start),
        audit_step: AuditStep {
            step_number,
            rule_id: "worked_hours".to_string(),
            rule_name: "Worked Hours".to_string(),
            input: serde_json::json!({
                "clock_in": clock_in.to_rfc3339(),
                "clock_out": clock_out.to_rfc3339(),
                "scheduled_start": scheduled_start.map(|t| t.to_rfc3339()),
                "closed_breaks": hms::format(&break_total),
                "open_breaks_skipped": skipped_open,
            }),
            output: serde_json::json!({
                "effective_start": effective_start.to_rfc3339(),
                "total_hours": hours.to_string(),
            }),
            reasoning: format!(
                "{} from {} to {} less {} of breaks = {}h",
                hms::format(&(clock_out - effective_start)),
                effective_start.format("%H:%M:%S"),
                clock_out.format("%H:%M:%S"),
                hms::format(&break_total),
                hours
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
    }

    #[test]
    fn test_eight_hour_shift_no_breaks() {
        let result = calculate_worked_hours(Some(at(9, 0)), Some(at(17, 0)), Some(at(9, 0)), &[], 1);
        assert_eq!(result.hours, Some(Decimal::new(8, 0)));
    }

    #[test]
    fn test_late_arrival_counts_from_clock_in() {
        let result = calculate_worked_hours(Some(at(9, 10)), Some(at(17, 0)), Some(at(9, 0)), &[], 1);
        assert_eq!(result.hours, Some(Decimal::new(783, 2)));
        assert_eq!(result.effective_start, Some(at(9, 10)));
    }

    #[test]
    fn test_closed_breaks_are_subtracted_and_open_skipped() {
        let breaks = vec![
            BreakPeriod {
                start: at(12, 0),
                end: Some(at(13, 0)),
            },
            BreakPeriod {
                start: at(15, 0),
                end: Some(at(15, 15)),
            },
            BreakPeriod {
                start: at(16, 0),
                end: None,
            },
        ];
        let result = calculate_worked_hours(Some(at(9, 0)), Some(at(17, 0)), None, &breaks, 1);
        assert_eq!(result.hours, Some(Decimal::new(675, 2)));
        assert_eq!(result.audit_step.input["open_breaks_skipped"], 1);
    }

    #[test]
    fn test_missing_clock_out_is_none_not_zero() {
        let result = calculate_worked_hours(Some(at(9, 0)), None, Some(at(9, 0)), &[], 1);
        assert_eq!(result.hours, None);

        let result = calculate_worked_hours(None, Some(at(17, 0)), None, &[], 1);
        assert_eq!(result.hours, None);
    }

    #[test]
    fn test_clock_out_before_scheduled_start_floors_at_zero() {
        let result = calculate_worked_hours(Some(at(7, 0)), Some(at(8, 30)), Some(at(9, 0)), &[], 1);
        assert_eq!(result.hours, Some(Decimal::ZERO));
    }

    proptest! {
        #[test]
        fn prop_hours_never_negative(
            in_minute in 0i64..600,
            out_offset in -120i64..720,
            break_minutes in 0i64..300,
        ) {
            let clock_in = at(0, 0) + Duration::minutes(in_minute);
            let clock_out = clock_in + Duration::minutes(out_offset);
            let breaks = vec![BreakPeriod {
                start: clock_in,
                end: Some(clock_in + Duration::minutes(break_minutes)),
            }];

            let result = calculate_worked_hours(Some(clock_in), Some(clock_out), Some(at(9, 0)), &breaks, 1);
            let hours = result.hours.unwrap();
            prop_assert!(hours >= Decimal::ZERO);
            prop_assert!(hours.scale() <= 2);
        }
    }
}
