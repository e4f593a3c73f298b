//! Calculation logic for the attendance ledger.
//!
//! This module contains the pure functions that derive a record's fields:
//! scheduled start resolution, lateness detection with tiered deductions,
//! worked hours net of breaks, and income including holiday pay. The
//! [`recompute`] function chains them over a record.

mod income;
mod lateness;
mod recompute;
mod schedule;
mod worked_hours;

use rust_decimal::{Decimal, RoundingStrategy};

pub use income::{IncomeResult, SPECIAL_NON_WORKING_MULTIPLIER, calculate_income};
pub use lateness::{
    DeductionResult, LatenessEvaluation, LatenessOutcome, SkipReason, calculate_deduction,
    evaluate_lateness, grace_period_for,
};
pub use recompute::{CalculationContext, Recomputation, RecomputeMode, recompute};
pub use schedule::{
    ScheduleSource, ScheduledStartResult, resolve_scheduled_start, scheduled_time_of_day,
};
pub use worked_hours::{WorkedHoursResult, calculate_worked_hours, duration_to_hours};

/// Rounds a monetary amount half-up (away from zero) to cents.
///
/// ```
/// use attendance_ledger::calculation::round_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_currency(Decimal::new(31218750, 6)), Decimal::new(3122, 2));
/// assert_eq!(round_currency(Decimal::new(-1125, 3)), Decimal::new(-113, 2));
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
