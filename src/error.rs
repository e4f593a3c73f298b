//! Error types for the attendance ledger.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while recording attendance.

use thiserror::Error;

/// The main error type for the attendance ledger.
///
/// Derived-field computation never produces an error: a record whose lateness
/// or hours cannot be resolved is persisted with zero values instead. Errors are
/// reserved for rejected state changes, unknown entities, invalid reference data
/// and collaborator failures.
///
/// # Example
///
/// ```
/// use attendance_ledger::error::LedgerError;
///
/// let error = LedgerError::EmployeeNotFound {
///     id: "emp_404".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found: emp_404");
/// ```
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An attendance status change was attempted that the current state does not allow.
    #[error("Invalid transition '{action}': {message}")]
    InvalidTransition {
        /// The attempted action (e.g. "start_break").
        action: String,
        /// Why the action was rejected.
        message: String,
    },

    /// No attendance record exists with the given id.
    #[error("Attendance record not found: {id}")]
    RecordNotFound {
        /// The record id that was not found.
        id: String,
    },

    /// The employee is not known to the directory.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The employee id that was not found.
        id: String,
    },

    /// Input or reference data failed validation.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The billing ledger rejected a record.
    #[error("Billing ledger error: {message}")]
    BillingFailed {
        /// A description of the failure.
        message: String,
    },
}

impl LedgerError {
    /// Shorthand for an [`LedgerError::InvalidTransition`].
    pub fn invalid_transition(action: &str, message: impl Into<String>) -> Self {
        Self::InvalidTransition {
            action: action.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`LedgerError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;
