//! Lateness rules and deduction tiers.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::hms;
use crate::error::{LedgerError, LedgerResult};

/// Grace period applied when an employee has no lateness rule assigned.
pub fn default_grace_period() -> Duration {
    Duration::minutes(5)
}

/// One tier of a lateness rule: lateness of at least `min_lateness` costs
/// `deduction_duration` worth of pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatenessDeduction {
    /// Name of the tier (e.g. "Minor Lateness").
    pub name: String,
    /// Minimum lateness that triggers this tier.
    #[serde(with = "hms")]
    pub min_lateness: Duration,
    /// Length of pay deducted when this tier applies.
    #[serde(with = "hms")]
    pub deduction_duration: Duration,
}

impl LatenessDeduction {
    /// Returns the deducted time in hours.
    ///
    /// ```
    /// use attendance_ledger::models::LatenessDeduction;
    /// use chrono::Duration;
    /// use rust_decimal::Decimal;
    ///
    /// let tier = LatenessDeduction {
    ///     name: "Minor".to_string(),
    ///     min_lateness: Duration::seconds(301),
    ///     deduction_duration: Duration::minutes(15),
    /// };
    /// assert_eq!(tier.deduction_hours(), Decimal::new(25, 2));
    /// ```
    pub fn deduction_hours(&self) -> Decimal {
        Decimal::from(self.deduction_duration.num_seconds()) / Decimal::from(3600)
    }
}

/// A named lateness policy: a grace period plus deduction tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatenessRule {
    /// Identifier referenced from employee records.
    pub id: String,
    /// Name of the policy (e.g. "Standard Lateness Policy").
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Lateness allowed before deductions apply.
    #[serde(with = "hms", default = "default_grace_period")]
    pub grace_period: Duration,
    /// Deduction tiers. Order does not matter; the tier is chosen by threshold.
    #[serde(default)]
    pub deductions: Vec<LatenessDeduction>,
}

impl LatenessRule {
    /// Returns the tier with the largest `min_lateness` not exceeding `lateness`.
    ///
    /// ```
    /// use attendance_ledger::models::{LatenessDeduction, LatenessRule};
    /// use chrono::Duration;
    ///
    /// let rule = LatenessRule {
    ///     id: "standard".to_string(),
    ///     name: "Standard".to_string(),
    ///     description: String::new(),
    ///     grace_period: Duration::minutes(5),
    ///     deductions: vec![
    ///         LatenessDeduction {
    ///             name: "Minor".to_string(),
    ///             min_lateness: Duration::minutes(5),
    ///             deduction_duration: Duration::minutes(15),
    ///         },
    ///         LatenessDeduction {
    ///             name: "Major".to_string(),
    ///             min_lateness: Duration::minutes(30),
    ///             deduction_duration: Duration::hours(1),
    ///         },
    ///     ],
    /// };
    /// assert_eq!(rule.tier_for(Duration::minutes(45)).unwrap().name, "Major");
    /// assert_eq!(rule.tier_for(Duration::minutes(10)).unwrap().name, "Minor");
    /// assert!(rule.tier_for(Duration::minutes(2)).is_none());
    /// ```
    pub fn tier_for(&self, lateness: Duration) -> Option<&LatenessDeduction> {
        self.deductions
            .iter()
            .filter(|tier| tier.min_lateness <= lateness)
            .max_by_key(|tier| tier.min_lateness)
    }

    /// Rejects negative grace periods and tier durations.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.grace_period < Duration::zero() {
            return Err(LedgerError::validation(
                "grace_period",
                format!("lateness rule '{}' has a negative grace period", self.id),
            ));
        }
        for tier in &self.deductions {
            if tier.min_lateness < Duration::zero() || tier.deduction_duration < Duration::zero() {
                return Err(LedgerError::validation(
                    "deductions",
                    format!(
                        "tier '{}' of lateness rule '{}' has a negative duration",
                        tier.name, self.id
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(name: &str, min: Duration, deduct: Duration) -> LatenessDeduction {
        LatenessDeduction {
            name: name.to_string(),
            min_lateness: min,
            deduction_duration: deduct,
        }
    }

    #[test]
    fn test_deserialize_rule_from_yaml() {
        let yaml = r#"
id: standard
name: Standard Lateness Policy
grace_period: "0:05:00"
deductions:
  - name: Minor
    min_lateness: "0:05:01"
    deduction_duration: "0:15:00"
"#;
        let rule: LatenessRule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rule.grace_period, Duration::minutes(5));
        assert_eq!(rule.deductions.len(), 1);
        assert_eq!(rule.deductions[0].min_lateness, Duration::seconds(301));
    }

    #[test]
    fn test_missing_grace_period_defaults_to_five_minutes() {
        let yaml = "id: lenient\nname: Lenient\n";
        let rule: LatenessRule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rule.grace_period, Duration::minutes(5));
        assert!(rule.deductions.is_empty());
    }

    #[test]
    fn test_tier_for_ignores_declaration_order() {
        let rule = LatenessRule {
            id: "r".to_string(),
            name: "R".to_string(),
            description: String::new(),
            grace_period: Duration::minutes(5),
            deductions: vec![
                tier("Major", Duration::minutes(30), Duration::hours(1)),
                tier("Minor", Duration::minutes(5), Duration::minutes(15)),
            ],
        };

        assert_eq!(rule.tier_for(Duration::minutes(30)).unwrap().name, "Major");
        assert_eq!(rule.tier_for(Duration::minutes(29)).unwrap().name, "Minor");
    }

    #[test]
    fn test_deduction_hours_for_two_hours() {
        let t = tier("Severe", Duration::hours(1), Duration::hours(2));
        assert_eq!(t.deduction_hours(), Decimal::from(2));
    }

    #[test]
    fn test_validate_rejects_negative_grace_period() {
        let rule = LatenessRule {
            id: "bad".to_string(),
            name: "Bad".to_string(),
            description: String::new(),
            grace_period: Duration::minutes(-1),
            deductions: vec![],
        };
        assert!(matches!(
            rule.validate(),
            Err(LedgerError::Validation { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_tier() {
        let rule = LatenessRule {
            id: "bad".to_string(),
            name: "Bad".to_string(),
            description: String::new(),
            grace_period: Duration::minutes(5),
            deductions: vec![tier("Neg", Duration::minutes(5), Duration::minutes(-15))],
        };
        assert!(rule.validate().is_err());
    }
}
