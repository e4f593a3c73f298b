//! Lateness evaluation and deduction tiers.
//!
//! Lateness is measured from the scheduled start to the clock-in. Only
//! lateness strictly greater than the grace period counts; the deduction is
//! taken from the first assigned rule that has a qualifying tier.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::round_currency;
use crate::models::{AuditStep, LatenessRule, STANDARD_HOURS_PER_DAY, default_grace_period, hms};

/// Why lateness was not (or not yet) recorded for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The employee arrived within the grace period.
    WithinGrace,
    /// The record is not the employee's first clock-in of the day.
    NotPrimary,
    /// Lateness was evaluated by an earlier write.
    AlreadyCalculated,
    /// The record has no clock-in time.
    NoClockIn,
    /// The scheduled start could not be resolved.
    ScheduleUnresolved,
}

/// The informational result of a lateness pass. Neither variant is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LatenessOutcome {
    /// The employee was late beyond the grace period.
    Late {
        /// How late the employee was.
        #[serde(with = "hms")]
        lateness: Duration,
        /// The deduction applied.
        deduction: Decimal,
    },
    /// No lateness was recorded.
    ComputationSkipped {
        /// Why.
        reason: SkipReason,
    },
}

/// The deduction chosen for a lateness, with the audit step.
#[derive(Debug, Clone)]
pub struct DeductionResult {
    /// The deducted amount, rounded to cents.
    pub amount: Decimal,
    /// The rule that supplied the tier.
    pub rule_id: Option<String>,
    /// The tier that applied.
    pub tier_name: Option<String>,
    /// The audit step recording the choice.
    pub audit_step: AuditStep,
}

/// The result of evaluating lateness for one clock-in.
#[derive(Debug, Clone)]
pub struct LatenessEvaluation {
    /// Late or skipped.
    pub outcome: LatenessOutcome,
    /// Lateness to store on the record (zero unless late).
    pub lateness: Duration,
    /// Deduction to store on the record.
    pub deduction: Decimal,
    /// Audit steps produced by the evaluation.
    pub audit_steps: Vec<AuditStep>,
}

/// Returns the grace period of the first assigned rule, or the 5 minute default.
pub fn grace_period_for(rules: &[&LatenessRule]) -> Duration {
    rules
        .first()
        .map(|rule| rule.grace_period)
        .unwrap_or_else(default_grace_period)
}

/// Chooses and prices the deduction for a lateness.
///
/// Rules are tried in assignment order. A rule qualifies when the lateness
/// exceeds its grace period and one of its tiers has `min_lateness` at or below
/// the lateness; the tier with the largest threshold is used. The first
/// qualifying rule's tier is the only deduction applied.
///
/// The amount is `per_day_rate / 8 × deduction hours`, rounded half-up to cents.
///
/// # Examples
///
/// ```
/// use attendance_ledger::calculation::calculate_deduction;
/// use attendance_ledger::models::{LatenessDeduction, LatenessRule};
/// use chrono::Duration;
/// use rust_decimal::Decimal;
///
/// let rule = LatenessRule {
///     id: "standard".to_string(),
///     name: "Standard".to_string(),
///     description: String::new(),
///     grace_period: Duration::minutes(5),
///     deductions: vec![LatenessDeduction {
///         name: "Minor".to_string(),
///         min_lateness: Duration::seconds(301),
///         deduction_duration: Duration::minutes(15),
///     }],
/// };
///
/// let result = calculate_deduction(Duration::minutes(10), &[&rule], Decimal::new(1000, 0), 1);
/// assert_eq!(result.amount, Decimal::new(3125, 2)); // 31.25
/// ```
pub fn calculate_deduction(
    lateness: Duration,
    rules: &[&LatenessRule],
    per_day_rate: Decimal,
    step_number: u32,
) -> DeductionResult {
    let hourly_rate = per_day_rate / STANDARD_HOURS_PER_DAY;

    let applied = rules
        .iter()
        .filter(|rule| lateness > rule.grace_period)
        .find_map(|rule| rule.tier_for(lateness).map(|tier| (*rule, tier)));

    let (amount, rule_id, tier_name, output, reasoning) = match applied {
        Some((rule, tier)) => {
            let hours = tier.deduction_hours();
            let amount = round_currency(hourly_rate * hours);
            (
                amount,
                Some(rule.id.clone()),
                Some(tier.name.clone()),
                serde_json::json!({
                    "rule_id": rule.id,
                    "tier": tier.name,
                    "deduction_hours": hours.to_string(),
                    "amount": amount.to_string(),
                }),
                format!(
                    "Lateness {} matches tier '{}' (>= {}) of rule '{}': {} × {}h = {}",
                    hms::format(&lateness),
                    tier.name,
                    hms::format(&tier.min_lateness),
                    rule.name,
                    hourly_rate.normalize(),
                    hours.normalize(),
                    amount
                ),
            )
        }
        None => (
            Decimal::ZERO,
            None,
            None,
            serde_json::json!({ "amount": "0" }),
            format!(
                "No deduction tier of {} assigned rule(s) applies to lateness {}",
                rules.len(),
                hms::format(&lateness)
            ),
        ),
    };

    DeductionResult {
        amount,
        rule_id,
        tier_name,
        audit_step: AuditStep {
            step_number,
            rule_id: "lateness_deduction".to_string(),
            rule_name: "Lateness Deduction".to_string(),
            input: serde_json::json!({
                "lateness": hms::format(&lateness),
                "per_day_rate": per_day_rate.to_string(),
                "rules": rules.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            }),
            output,
            reasoning,
        },
    }
}

/// Evaluates lateness for a clock-in against its scheduled start.
///
/// Lateness counts only when it is strictly greater than the grace period;
/// arriving exactly at the end of the grace period is on time.
///
/// # Examples
///
/// ```
/// use attendance_ledger::calculation::{LatenessOutcome, SkipReason, evaluate_lateness};
/// use chrono::{Duration, TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let scheduled = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
///
/// // No rules: 5 minute default grace, no deduction.
/// let on_time = evaluate_lateness(scheduled + Duration::minutes(5), scheduled, &[], Decimal::new(1000, 0), 1);
/// assert_eq!(on_time.outcome, LatenessOutcome::ComputationSkipped { reason: SkipReason::WithinGrace });
///
/// let late = evaluate_lateness(scheduled + Duration::minutes(20), scheduled, &[], Decimal::new(1000, 0), 1);
/// assert_eq!(late.lateness, Duration::minutes(20));
/// assert_eq!(late.deduction, Decimal::ZERO);
/// ```
pub fn evaluate_lateness(
    clock_in: DateTime<Utc>,
    scheduled_start: DateTime<Utc>,
    rules: &[&LatenessRule],
    per_day_rate: Decimal,
    step_number: u32,
) -> LatenessEvaluation {
    let grace = grace_period_for(rules);
    let raw_lateness = clock_in - scheduled_start;
    let is_late = raw_lateness > grace;

    let detection = AuditStep {
        step_number,
        rule_id: "lateness_detection".to_string(),
        rule_name: "Lateness Detection".to_string(),
        input: serde_json::json!({
            "clock_in": clock_in.to_rfc3339(),
            "scheduled_start": scheduled_start.to_rfc3339(),
            "grace_period": hms::format(&grace),
        }),
        output: serde_json::json!({
            "lateness": hms::format(&raw_lateness),
            "is_late": is_late,
        }),
        reasoning: if is_late {
            format!(
                "Clocked in {} after scheduled start, beyond grace period {}",
                hms::format(&raw_lateness),
                hms::format(&grace)
            )
        } else {
            format!(
                "Clock-in within grace period {} of scheduled start",
                hms::format(&grace)
            )
        },
    };

    if !is_late {
        return LatenessEvaluation {
            outcome: LatenessOutcome::ComputationSkipped {
                reason: SkipReason::WithinGrace,
            },
            lateness: Duration::zero(),
            deduction: Decimal::ZERO,
            audit_steps: vec![detection],
        };
    }

    let deduction = calculate_deduction(raw_lateness, rules, per_day_rate, step_number + 1);
    LatenessEvaluation {
        outcome: LatenessOutcome::Late {
            lateness: raw_lateness,
            deduction: deduction.amount,
        },
        lateness: raw_lateness,
        deduction: deduction.amount,
        audit_steps: vec![detection, deduction.audit_step],
    }
}
