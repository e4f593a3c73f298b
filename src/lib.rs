//! Attendance ledger and pay calculator.
//!
//! This crate records employee clock-in, break and clock-out cycles and derives
//! lateness, lateness deductions, worked hours and income for every record,
//! applying configurable grace periods, tiered deductions and holiday pay rules.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
