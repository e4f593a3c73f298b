//! Reference data the ledger reads: employees, lateness rules, holidays and
//! global settings.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::calculation::CalculationContext;
use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Employee, GlobalSettings, HolidayCalendar, LatenessRule};

/// Read access to reference data, plus explicit employee provisioning.
///
/// Lateness rules, holidays and settings are fixed at construction.
/// Employees may be added or replaced with [`Directory::upsert_employee`].
#[derive(Debug)]
pub struct Directory {
    settings: GlobalSettings,
    calendar: HolidayCalendar,
    lateness_rules: HashMap<String, LatenessRule>,
    employees: RwLock<HashMap<String, Employee>>,
}

impl Directory {
    /// Creates a directory from loaded configuration.
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            settings: config.settings().clone(),
            calendar: config.calendar().clone(),
            lateness_rules: config.lateness_rules().clone(),
            employees: RwLock::new(config.employees().clone()),
        }
    }

    /// Returns a copy of an employee.
    pub fn employee(&self, id: &str) -> LedgerResult<Employee> {
        self.employees
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::EmployeeNotFound { id: id.to_string() })
    }

    /// Adds or replaces an employee.
    ///
    /// Idempotent: writing the same employee twice leaves one entry. The
    /// employee is validated and every assigned rule must exist.
    pub fn upsert_employee(&self, employee: Employee) -> LedgerResult<Employee> {
        employee.validate()?;
        if let Some(unknown) = employee
            .lateness_rules
            .iter()
            .find(|id| !self.lateness_rules.contains_key(id.as_str()))
        {
            return Err(LedgerError::validation(
                "lateness_rules",
                format!("unknown lateness rule '{}'", unknown),
            ));
        }

        let previous = self
            .employees
            .write()
            .insert(employee.id.clone(), employee.clone());

        info!(
            employee_id = %employee.id,
            replaced = previous.is_some(),
            "Upserted employee"
        );
        Ok(employee)
    }

    /// Returns an employee's lateness rules in assignment order.
    pub fn rules_for(&self, employee: &Employee) -> Vec<&LatenessRule> {
        employee
            .lateness_rules
            .iter()
            .filter_map(|id| {
                let rule = self.lateness_rules.get(id);
                if rule.is_none() {
                    warn!(employee_id = %employee.id, rule_id = %id, "Unknown lateness rule, skipping");
                }
                rule
            })
            .collect()
    }

    /// Builds the calculation context for one employee.
    pub fn context<'a>(&'a self, employee: &'a Employee) -> CalculationContext<'a> {
        CalculationContext {
            employee,
            rules: self.rules_for(employee),
            settings: &self.settings,
            calendar: &self.calendar,
        }
    }

    /// Returns the global settings.
    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    /// Returns the holiday calendar.
    pub fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn rule(id: &str) -> LatenessRule {
        LatenessRule {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            grace_period: Duration::minutes(5),
            deductions: vec![],
        }
    }

    fn employee(id: &str, rules: &[&str]) -> Employee {
        Employee {
            id: id.to_string(),
            name: String::new(),
            per_day_rate: Decimal::new(1000, 0),
            scheduled_start_time: None,
            lateness_rules: rules.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn directory() -> Directory {
        Directory::new(&LedgerConfig::new(
            GlobalSettings::default(),
            vec![employee("emp_001", &["b", "a"])],
            vec![rule("a"), rule("b")],
            HolidayCalendar::default(),
        ))
    }

    #[test]
    fn test_rules_keep_assignment_order() {
        let directory = directory();
        let emp = directory.employee("emp_001").unwrap();
        let ids: Vec<&str> = directory
            .rules_for(&emp)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_unknown_employee() {
        assert!(matches!(
            directory().employee("emp_404"),
            Err(LedgerError::EmployeeNotFound { .. })
        ));
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let directory = directory();
        let mut emp = employee("emp_002", &["a"]);
        directory.upsert_employee(emp.clone()).unwrap();
        directory.upsert_employee(emp.clone()).unwrap();

        emp.per_day_rate = Decimal::new(1500, 0);
        directory.upsert_employee(emp).unwrap();

        assert_eq!(
            directory.employee("emp_002").unwrap().per_day_rate,
            Decimal::new(1500, 0)
        );
    }

    #[test]
    fn test_upsert_rejects_unknown_rule_and_negative_rate() {
        let directory = directory();
        assert!(matches!(
            directory.upsert_employee(employee("emp_002", &["missing"])),
            Err(LedgerError::Validation { .. })
        ));

        let mut negative = employee("emp_003", &[]);
        negative.per_day_rate = Decimal::new(-5, 0);
        assert!(directory.upsert_employee(negative).is_err());
        assert!(directory.employee("emp_003").is_err());
    }
}
