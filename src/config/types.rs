//! Configuration types for the attendance ledger.
//!
//! This module contains the strongly-typed structures deserialized from the
//! YAML reference data files.

use serde::Deserialize;
use std::collections::HashMap;

use crate::models::{Employee, GlobalSettings, Holiday, HolidayCalendar, LatenessRule};

/// Employees configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeesFile {
    /// All employees known to the directory.
    #[serde(default)]
    pub employees: Vec<Employee>,
}

/// Lateness rules configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct LatenessRulesFile {
    /// All lateness rules that employees can be assigned.
    #[serde(default)]
    pub lateness_rules: Vec<LatenessRule>,
}

/// Holidays configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidaysFile {
    /// All holiday definitions.
    #[serde(default)]
    pub holidays: Vec<Holiday>,
}

/// The complete reference data of a ledger deployment.
#[derive(Debug, Clone, Default)]
pub struct LedgerConfig {
    settings: GlobalSettings,
    employees: HashMap<String, Employee>,
    lateness_rules: HashMap<String, LatenessRule>,
    calendar: HolidayCalendar,
}

impl LedgerConfig {
    /// Assembles a configuration from its parts.
    ///
    /// Later entries with a duplicate id replace earlier ones; the loader
    /// rejects duplicates before calling this.
    pub fn new(
        settings: GlobalSettings,
        employees: Vec<Employee>,
        lateness_rules: Vec<LatenessRule>,
        calendar: HolidayCalendar,
    ) -> Self {
        Self {
            settings,
            employees: employees.into_iter().map(|e| (e.id.clone(), e)).collect(),
            lateness_rules: lateness_rules
                .into_iter()
                .map(|r| (r.id.clone(), r))
                .collect(),
            calendar,
        }
    }

    /// Returns the global settings.
    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    /// Returns all employees keyed by id.
    pub fn employees(&self) -> &HashMap<String, Employee> {
        &self.employees
    }

    /// Returns all lateness rules keyed by id.
    pub fn lateness_rules(&self) -> &HashMap<String, LatenessRule> {
        &self.lateness_rules
    }

    /// Returns the holiday calendar.
    pub fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }
}
