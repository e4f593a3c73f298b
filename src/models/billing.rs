//! Billing records emitted to the billing ledger.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether income came from a holiday or a regular working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Income earned on (or credited for) a holiday.
    Holiday,
    /// Income from a regular working day.
    Regular,
}

/// The billing fact produced by a completed attendance cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingEntry {
    /// The employee who earned the income.
    pub employee_id: String,
    /// The attendance record the income came from.
    pub attendance_id: Uuid,
    /// Local calendar date the income belongs to.
    pub date: NaiveDate,
    /// Income net of lateness deductions.
    pub total_income: Decimal,
    /// Hours worked, if any were recorded.
    pub hours_worked: Option<Decimal>,
    /// Holiday or regular pay.
    pub payment_type: PaymentType,
}

/// An immutable billing record as stored by the billing ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRecord {
    /// Unique identifier of the billing record.
    pub id: Uuid,
    /// When the ledger accepted the record.
    pub created_at: DateTime<Utc>,
    /// The billed fact.
    #[serde(flatten)]
    pub entry: BillingEntry,
}
