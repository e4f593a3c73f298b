//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the ledger's
//! reference data from YAML files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Employee, GlobalSettings, HolidayCalendar, LatenessRule};

use super::types::{EmployeesFile, HolidaysFile, LatenessRulesFile, LedgerConfig};

/// Loads and provides access to the ledger's reference data.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── settings.yaml        # Global scheduled start and time zone
/// ├── employees.yaml       # Day rates, start times, assigned rules
/// ├── lateness_rules.yaml  # Grace periods and deduction tiers
/// └── holidays.yaml        # Fixed and recurring holidays
/// ```
///
/// `settings.yaml` and `holidays.yaml` are optional; the other two files are
/// required.
///
/// # Example
///
/// ```no_run
/// use attendance_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let employee = loader.get_employee("emp_001").unwrap();
/// println!("Day rate: {}", employee.per_day_rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: LedgerConfig,
}

impl ConfigLoader {
    /// Loads and validates configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns an error if:
    /// - A required file is missing
    /// - Any file contains invalid YAML
    /// - An employee, rule or holiday fails validation
    /// - Ids are duplicated, or an employee references an unknown rule
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let path = path.as_ref();

        let settings_path = path.join("settings.yaml");
        let settings = if settings_path.exists() {
            Self::load_yaml::<GlobalSettings>(&settings_path)?
        } else {
            GlobalSettings::default()
        };

        let employees = Self::load_yaml::<EmployeesFile>(&path.join("employees.yaml"))?.employees;
        let rules =
            Self::load_yaml::<LatenessRulesFile>(&path.join("lateness_rules.yaml"))?.lateness_rules;

        let holidays_path = path.join("holidays.yaml");
        let calendar = if holidays_path.exists() {
            HolidayCalendar::new(Self::load_yaml::<HolidaysFile>(&holidays_path)?.holidays)
        } else {
            HolidayCalendar::default()
        };

        Self::validate(&employees, &rules, &calendar)?;

        info!(
            path = %path.display(),
            employees = employees.len(),
            lateness_rules = rules.len(),
            holidays = calendar.holidays.len(),
            time_zone = %settings.time_zone,
            "Loaded ledger configuration"
        );

        Ok(Self {
            config: LedgerConfig::new(settings, employees, rules, calendar),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> LedgerResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| LedgerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| LedgerError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(
        employees: &[Employee],
        rules: &[LatenessRule],
        calendar: &HolidayCalendar,
    ) -> LedgerResult<()> {
        let mut rule_ids = HashSet::new();
        for rule in rules {
            rule.validate()?;
            if !rule_ids.insert(rule.id.as_str()) {
                return Err(LedgerError::validation(
                    "lateness_rules.id",
                    format!("duplicate lateness rule '{}'", rule.id),
                ));
            }
        }

        let mut employee_ids = HashSet::new();
        for employee in employees {
            employee.validate()?;
            if !employee_ids.insert(employee.id.as_str()) {
                return Err(LedgerError::validation(
                    "employees.id",
                    format!("duplicate employee '{}'", employee.id),
                ));
            }
            if let Some(unknown) = employee
                .lateness_rules
                .iter()
                .find(|id| !rule_ids.contains(id.as_str()))
            {
                return Err(LedgerError::validation(
                    "lateness_rules",
                    format!(
                        "employee '{}' references unknown lateness rule '{}'",
                        employee.id, unknown
                    ),
                ));
            }
        }

        calendar.validate()
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> LedgerConfig {
        self.config
    }

    /// Gets an employee by id.
    pub fn get_employee(&self, id: &str) -> LedgerResult<&Employee> {
        self.config
            .employees()
            .get(id)
            .ok_or_else(|| LedgerError::EmployeeNotFound { id: id.to_string() })
    }

    /// Gets a lateness rule by id.
    pub fn get_lateness_rule(&self, id: &str) -> Option<&LatenessRule> {
        self.config.lateness_rules().get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveTime};
    use rust_decimal::Decimal;
    use std::path::PathBuf;

    fn config_path() -> &'static str {
        "./config/default"
    }

    /// Writes the given files into a fresh temporary directory.
    fn temp_config(name: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "attendance_ledger_{}_{}",
            name,
            uuid::Uuid::new_v4()
        ));
        fs::create_dir_all(&dir).unwrap();
        for (file, content) in files {
            fs::write(dir.join(file), content).unwrap();
        }
        dir
    }

    const RULES: &str = r#"
lateness_rules:
  - id: standard
    name: Standard
    grace_period: "0:05:00"
    deductions:
      - name: Minor
        min_lateness: "0:05:01"
        deduction_duration: "0:15:00"
"#;

    #[test]
    fn test_load_default_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(
            loader.config().settings().scheduled_start_time,
            NaiveTime::from_hms_opt(9, 0, 0)
        );
        assert_eq!(loader.config().settings().time_zone, chrono_tz::Asia::Manila);

        let employee = loader.get_employee("emp_001").unwrap();
        assert_eq!(employee.per_day_rate, Decimal::new(1000, 0));
        assert_eq!(employee.lateness_rules, vec!["standard"]);

        let rule = loader.get_lateness_rule("standard").unwrap();
        assert_eq!(rule.grace_period, Duration::minutes(5));

        let new_year = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert!(loader.config().calendar().resolve(new_year).is_some());
    }

    #[test]
    fn test_get_employee_unknown_returns_error() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        match loader.get_employee("emp_404") {
            Err(LedgerError::EmployeeNotFound { id }) => assert_eq!(id, "emp_404"),
            other => panic!("Expected EmployeeNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(LedgerError::ConfigNotFound { path }) => {
                assert!(path.contains("employees.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_optional_files_default() {
        let dir = temp_config(
            "optional",
            &[
                ("employees.yaml", "employees:\n  - id: emp_001\n    per_day_rate: \"800\"\n"),
                ("lateness_rules.yaml", "lateness_rules: []\n"),
            ],
        );

        let loader = ConfigLoader::load(&dir).unwrap();
        assert_eq!(loader.config().settings(), &GlobalSettings::default());
        assert!(loader.config().calendar().holidays.is_empty());

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = temp_config(
            "parse",
            &[
                ("employees.yaml", "employees: [not: valid: yaml"),
                ("lateness_rules.yaml", RULES),
            ],
        );

        let result = ConfigLoader::load(&dir);
        assert!(matches!(result, Err(LedgerError::ConfigParseError { .. })));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_unknown_rule_reference_is_rejected() {
        let dir = temp_config(
            "unknown_rule",
            &[
                (
                    "employees.yaml",
                    "employees:\n  - id: emp_001\n    per_day_rate: \"800\"\n    lateness_rules: [missing]\n",
                ),
                ("lateness_rules.yaml", RULES),
            ],
        );

        match ConfigLoader::load(&dir) {
            Err(LedgerError::Validation { message, .. }) => assert!(message.contains("missing")),
            other => panic!("Expected Validation error, got {:?}", other),
        }

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_duplicate_employee_is_rejected() {
        let dir = temp_config(
            "duplicate",
            &[
                (
                    "employees.yaml",
                    "employees:\n  - id: emp_001\n    per_day_rate: \"800\"\n  - id: emp_001\n    per_day_rate: \"900\"\n",
                ),
                ("lateness_rules.yaml", RULES),
            ],
        );

        assert!(matches!(
            ConfigLoader::load(&dir),
            Err(LedgerError::Validation { .. })
        ));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_negative_day_rate_is_rejected() {
        let dir = temp_config(
            "negative",
            &[
                ("employees.yaml", "employees:\n  - id: emp_001\n    per_day_rate: \"-1\"\n"),
                ("lateness_rules.yaml", RULES),
            ],
        );

        match ConfigLoader::load(&dir) {
            Err(LedgerError::Validation { field, .. }) => assert_eq!(field, "per_day_rate"),
            other => panic!("Expected Validation error, got {:?}", other),
        }

        fs::remove_dir_all(dir).ok();
    }
}
