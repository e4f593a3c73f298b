//! The billing ledger collaborator.
//!
//! The attendance ledger only ever writes to billing: one immutable record per
//! completed clock-out or holiday credit.


use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::LedgerResult;
use crate::models::{BillingEntry, BillingRecord};

/// A write-only sink for billing facts.
pub trait BillingLedger: Send + Sync {
    /// Records one billing entry, returning the stored record.
    fn record(&self, entry: BillingEntry) -> LedgerResult<BillingRecord>;
}

/// A billing ledger that keeps records in memory.
#[derive(Debug, Default)]
pub struct InMemoryBillingLedger {
    records: RwLock<Vec<BillingRecord>>,
}

impl InMemoryBillingLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an employee's billing records in the order they were written.
    pub fn records_for(&self, employee_id: &str) -> Vec<BillingRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.entry.employee_id == employee_id)
            .cloned()
            .collect()
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .len()
    }

    /// Returns true when nothing has been billed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BillingLedger for InMemoryBillingLedger {
    fn record(&self, entry: BillingEntry) -> LedgerResult<BillingRecord> {
        let record = BillingRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            entry,
        };
        debug!(
            billing_id = %record.id,
            employee_id = %record.entry.employee_id,
            attendance_id = %record.entry.attendance_id,
            total_income = %record.entry.total_income,
            "Recorded billing entry"
        );
        self.records
            .write()
            .push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentType;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn entry(employee_id: &str) -> BillingEntry {
        BillingEntry {
            employee_id: employee_id.to_string(),
            attendance_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            total_income: Decimal::new(100000, 2),
            hours_worked: Some(Decimal::new(8, 0)),
            payment_type: PaymentType::Regular,
        }
    }

    #[test]
    fn test_records_are_filtered_by_employee() {
        let ledger = InMemoryBillingLedger::new();
        assert!(ledger.is_empty());

        ledger.record(entry("emp_001")).unwrap();
        ledger.record(entry("emp_002")).unwrap();
        ledger.record(entry("emp_001")).unwrap();

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.records_for("emp_001").len(), 2);
        assert!(ledger.records_for("emp_404").is_empty());
    }

    #[test]
    fn test_record_assigns_unique_ids() {
        let ledger = InMemoryBillingLedger::new();
        let first = ledger.record(entry("emp_001")).unwrap();
        let second = ledger.record(entry("emp_001")).unwrap();
        assert_ne!(first.id, second.id);
    }
}
