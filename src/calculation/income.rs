//! Income calculation, including holiday pay.
//!
//! | Day                          | Clocked in                                | Not clocked in |
//! |------------------------------|-------------------------------------------|----------------|
//! | Non-working holiday          | rate + hours/8 × rate                     | rate           |
//! | Special non-working holiday  | hours/8 × rate × 1.3 − deduction          | 0              |
//! | Regular day                  | hours/8 × rate − deduction                | 0              |
//!
//! Income may go negative when a deduction outweighs the pay for a short session.

use rust_decimal::Decimal;

use super::round_currency;
use crate::models::{AuditStep, HolidayType, PaymentType, STANDARD_HOURS_PER_DAY};

/// Premium multiplier for work on a special non-working holiday.
pub const SPECIAL_NON_WORKING_MULTIPLIER: Decimal = Decimal::from_parts(13, 0, 0, false, 1);

/// The result of an income calculation, with its audit step.
#[derive(Debug, Clone)]
pub struct IncomeResult {
    /// Income rounded to cents.
    pub total_income: Decimal,
    /// Holiday or regular pay.
    pub payment_type: PaymentType,
    /// The audit step recording the calculation.
    pub audit_step: AuditStep,
}

/// Calculates income for one attendance record.
///
/// # Arguments
///
/// * `per_day_rate` - The employee's day rate
/// * `total_hours` - Worked hours, if both clock times exist
/// * `lateness_deduction` - The deduction recorded for the record
/// * `holiday` - The holiday type the record falls on
/// * `clocked_in` - Whether the record has a clock-in
/// * `step_number` - The step number for audit trail sequencing
///
/// Without worked hours (session still open, or zero hours) the hourly part of
/// every branch is zero and no deduction is charged.
///
/// # Examples
///
/// ```
/// use attendance_ledger::calculation::calculate_income;
/// use attendance_ledger::models::HolidayType;
/// use rust_decimal::Decimal;
///
/// let rate = Decimal::new(1000, 0);
/// let eight = Some(Decimal::new(8, 0));
///
/// let regular = calculate_income(rate, eight, Decimal::ZERO, None, true, 1);
/// assert_eq!(regular.total_income, Decimal::new(1000, 0));
///
/// let special = calculate_income(rate, eight, Decimal::ZERO, Some(HolidayType::SpecialNonWorking), true, 1);
/// assert_eq!(special.total_income, Decimal::new(1300, 0));
///
/// let absent = calculate_income(rate, None, Decimal::ZERO, Some(HolidayType::NonWorking), false, 1);
/// assert_eq!(absent.total_income, rate);
/// ```
pub fn calculate_income(
    per_day_rate: Decimal,
    total_hours: Option<Decimal>,
    lateness_deduction: Decimal,
    holiday: Option<HolidayType>,
    clocked_in: bool,
    step_number: u32,
) -> IncomeResult {
    let worked = total_hours.filter(|h| *h > Decimal::ZERO && per_day_rate > Decimal::ZERO);
    let day_fraction_pay = worked.map(|h| h / STANDARD_HOURS_PER_DAY * per_day_rate);

    let (income, branch, reasoning) = match (holiday, clocked_in) {
        (Some(HolidayType::NonWorking), false) => (
            per_day_rate,
            "non_working_absent",
            format!("Non-working holiday without attendance pays the day rate {}", per_day_rate),
        ),
        (Some(HolidayType::NonWorking), true) => {
            let extra = day_fraction_pay.unwrap_or(Decimal::ZERO);
            (
                per_day_rate + extra,
                "non_working_worked",
                format!(
                    "Non-working holiday worked: day rate {} plus {} for {}h",
                    per_day_rate,
                    round_currency(extra),
                    worked.unwrap_or(Decimal::ZERO)
                ),
            )
        }
        (Some(HolidayType::SpecialNonWorking), true) => match day_fraction_pay {
            Some(pay) => {
                let premium = pay * SPECIAL_NON_WORKING_MULTIPLIER;
                (
                    premium - lateness_deduction,
                    "special_non_working_worked",
                    format!(
                        "Special non-working holiday: {} × {} less deduction {}",
                        round_currency(pay),
                        SPECIAL_NON_WORKING_MULTIPLIER,
                        lateness_deduction
                    ),
                )
            }
            None => (
                Decimal::ZERO,
                "special_non_working_worked",
                "Special non-working holiday with no worked hours yet".to_string(),
            ),
        },
        (Some(HolidayType::SpecialNonWorking), false) => (
            Decimal::ZERO,
            "special_non_working_absent",
            "Special non-working holiday without attendance is unpaid".to_string(),
        ),
        (None, _) => match day_fraction_pay {
            Some(pay) => (
                pay - lateness_deduction,
                "regular",
                format!(
                    "{}h of {} per {}h day = {} less deduction {}",
                    worked.unwrap_or(Decimal::ZERO),
                    per_day_rate,
                    STANDARD_HOURS_PER_DAY,
                    round_currency(pay),
                    lateness_deduction
                ),
            ),
            None => (
                Decimal::ZERO,
                "regular",
                "No worked hours or no day rate".to_string(),
            ),
        },
    };

    let total_income = round_currency(income);
    let payment_type = if holiday.is_some() {
        PaymentType::Holiday
    } else {
        PaymentType::Regular
    };

    IncomeResult {
        total_income,
        payment_type,
        audit_step: AuditStep {
            step_number,
            rule_id: "income".to_string(),
            rule_name: "Income".to_string(),
            input: serde_json::json!({
                "per_day_rate": per_day_rate.to_string(),
                "total_hours": total_hours.map(|h| h.to_string()),
                "lateness_deduction": lateness_deduction.to_string(),
                "holiday_type": holiday,
                "clocked_in": clocked_in,
            }),
            output: serde_json::json!({
                "branch": branch,
                "total_income": total_income.to_string(),
                "payment_type": payment_type,
            }),
            reasoning,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_regular_eight_hours_pays_day_rate() {
        let result = calculate_income(dec("1000"), Some(dec("8.00")), Decimal::ZERO, None, true, 1);
        assert_eq!(result.total_income, dec("1000.00"));
        assert_eq!(result.payment_type, PaymentType::Regular);
    }

    #[test]
    fn test_regular_with_deduction() {
        // 7.83 / 8 × 1000 = 978.75, less 31.25
        let result = calculate_income(dec("1000"), Some(dec("7.83")), dec("31.25"), None, true, 1);
        assert_eq!(result.total_income, dec("947.50"));
    }

    #[test]
    fn test_regular_can_go_negative() {
        // 0.1h of 1000/day = 12.50, less a 125.00 deduction
        let result = calculate_income(dec("1000"), Some(dec("0.10")), dec("125.00"), None, true, 1);
        assert_eq!(result.total_income, dec("-112.50"));
    }

    #[test]
    fn test_regular_without_hours_is_zero() {
        let result = calculate_income(dec("1000"), None, dec("31.25"), None, true, 1);
        assert_eq!(result.total_income, Decimal::ZERO);

        let result = calculate_income(Decimal::ZERO, Some(dec("8")), Decimal::ZERO, None, true, 1);
        assert_eq!(result.total_income, Decimal::ZERO);
    }

    #[test]
    fn test_non_working_absent_pays_day_rate_regardless_of_deduction() {
        let result = calculate_income(
            dec("1000"),
            None,
            dec("31.25"),
            Some(HolidayType::NonWorking),
            false,
            1,
        );
        assert_eq!(result.total_income, dec("1000"));
        assert_eq!(result.payment_type, PaymentType::Holiday);
    }

    #[test]
    fn test_non_working_worked_pays_double_for_full_day() {
        let result = calculate_income(
            dec("1000"),
            Some(dec("8")),
            Decimal::ZERO,
            Some(HolidayType::NonWorking),
            true,
            1,
        );
        assert_eq!(result.total_income, dec("2000"));
    }

    #[test]
    fn test_non_working_worked_ignores_deduction() {
        let result = calculate_income(
            dec("1000"),
            Some(dec("4")),
            dec("31.25"),
            Some(HolidayType::NonWorking),
            true,
            1,
        );
        assert_eq!(result.total_income, dec("1500"));
    }

    #[test]
    fn test_special_non_working_full_day() {
        let result = calculate_income(
            dec("1000"),
            Some(dec("8")),
            Decimal::ZERO,
            Some(HolidayType::SpecialNonWorking),
            true,
            1,
        );
        assert_eq!(result.total_income, dec("1300"));
    }

    #[test]
    fn test_special_non_working_with_deduction() {
        // 4/8 × 1000 × 1.3 = 650, less 31.25
        let result = calculate_income(
            dec("1000"),
            Some(dec("4")),
            dec("31.25"),
            Some(HolidayType::SpecialNonWorking),
            true,
            1,
        );
        assert_eq!(result.total_income, dec("618.75"));
    }

    #[test]
    fn test_special_non_working_absent_is_zero() {
        let result = calculate_income(
            dec("1000"),
            None,
            Decimal::ZERO,
            Some(HolidayType::SpecialNonWorking),
            false,
            1,
        );
        assert_eq!(result.total_income, Decimal::ZERO);
        assert_eq!(result.payment_type, PaymentType::Holiday);
    }

    #[test]
    fn test_income_rounds_to_cents() {
        // 1/8 × 333.33 = 41.66625 -> 41.67
        let result = calculate_income(dec("333.33"), Some(dec("1")), Decimal::ZERO, None, true, 1);
        assert_eq!(result.total_income, dec("41.67"));
        assert_eq!(result.audit_step.output["branch"], "regular");
    }
}
