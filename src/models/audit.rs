//! Calculation audit steps.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application,
/// so a stored record explains how its lateness, hours and income were derived.
///
/// # Example
///
/// ```
/// use attendance_ledger::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "scheduled_start".to_string(),
///     rule_name: "Scheduled Start Resolution".to_string(),
///     input: serde_json::json!({"clock_in_date": "2026-03-02"}),
///     output: serde_json::json!({"scheduled_start": "2026-03-02T09:00:00+08:00"}),
///     reasoning: "Using global scheduled start 09:00:00".to_string(),
/// };
/// assert_eq!(step.rule_id, "scheduled_start");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number within one recomputation.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}
