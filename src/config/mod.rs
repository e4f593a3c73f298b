//! Configuration loading and management for the attendance ledger.
//!
//! This module loads the reference data (global settings, employees, lateness
//! rules and holidays) from YAML files and reads process settings from the
//! environment.
//!
//! # Example
//!
//! ```no_run
//! use attendance_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Employees: {}", config.config().employees().len());
//! ```

mod env;
mod loader;
mod types;

pub use env::{DEFAULT_ADDR, DEFAULT_CONFIG_DIR, ServerConfig};
pub use loader::ConfigLoader;
pub use types::{EmployeesFile, HolidaysFile, LatenessRulesFile, LedgerConfig};
