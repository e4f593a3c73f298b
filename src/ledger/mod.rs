//! The attendance ledger: record storage, reference data, billing and the
//! service that ties them together.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use attendance_ledger::config::LedgerConfig;
//! use attendance_ledger::ledger::{AttendanceLedger, Directory, InMemoryBillingLedger};
//! use attendance_ledger::models::Employee;
//! use chrono::{TimeZone, Utc};
//! use rust_decimal::Decimal;
//!
//! let config = LedgerConfig::new(
//!     Default::default(),
//!     vec![Employee {
//!         id: "emp_001".to_string(),
//!         name: "Maria".to_string(),
//!         per_day_rate: Decimal::new(1000, 0),
//!         scheduled_start_time: None,
//!         lateness_rules: vec![],
//!     }],
//!     vec![],
//!     Default::default(),
//! );
//! let ledger = AttendanceLedger::new(
//!     Directory::new(&config),
//!     Arc::new(InMemoryBillingLedger::new()),
//! );
//!
//! let clock_in = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
//! let record = ledger.record_clock_in("emp_001", clock_in).unwrap().record;
//!
//! let clock_out = Utc.with_ymd_and_hms(2026, 3, 2, 17, 0, 0).unwrap();
//! let receipt = ledger.clock_out(record.id, clock_out).unwrap();
//! assert_eq!(receipt.record.total_income, Decimal::new(1000, 0));
//! ```

mod billing;
mod directory;
mod service;
mod store;

pub use billing::{BillingLedger, InMemoryBillingLedger};
pub use directory::Directory;
pub use service::{AttendanceLedger, AttendanceSummary, ClockInReceipt, ClockOutReceipt};
pub use store::AttendanceStore;
