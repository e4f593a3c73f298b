//! Core data models for the attendance ledger.
//!
//! This module contains all the domain models used throughout the ledger.

mod attendance;
mod audit;
mod billing;
mod employee;
pub mod hms;
mod holiday;
mod lateness;
mod settings;

pub use attendance::{AttendanceRecord, AttendanceStatus, BreakPeriod};
pub use audit::AuditStep;
pub use billing::{BillingEntry, BillingRecord, PaymentType};
pub use employee::{Employee, STANDARD_HOURS_PER_DAY};
pub use holiday::{Holiday, HolidayCalendar, HolidayRef, HolidayType};
pub use lateness::{LatenessDeduction, LatenessRule, default_grace_period};
pub use settings::{GlobalSettings, fallback_scheduled_start};
