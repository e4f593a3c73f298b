//! In-memory attendance record storage with per-employee write locks.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::models::AttendanceRecord;

/// Stores attendance records and serializes writers per employee.
///
/// Readers take a short read lock on the record map. Writers first take the
/// employee's lock through [`AttendanceStore::with_employee_lock`], so a state
/// check and the write that depends on it cannot interleave with another
/// writer for the same employee.
#[derive(Debug, Default)]
pub struct AttendanceStore {
    records: RwLock<HashMap<Uuid, AttendanceRecord>>,
    employee_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl AttendanceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding the employee's write lock.
    pub fn with_employee_lock<T>(&self, employee_id: &str, f: impl FnOnce() -> T) -> T {
        // The map shard guard is released before the employee lock is taken.
        let lock = Arc::clone(&self.employee_locks.entry(employee_id.to_string()).or_default());
        let _guard = lock.lock();
        f()
    }

    /// Returns a copy of a record.
    pub fn get(&self, id: Uuid) -> Option<AttendanceRecord> {
        self.records
            .read()
            .get(&id)
            .cloned()
    }

    /// Inserts or replaces a record.
    pub fn put(&self, record: AttendanceRecord) {
        self.records
            .write()
            .insert(record.id, record);
    }

    /// Returns copies of every record belonging to an employee, in no
    /// particular order.
    pub fn for_employee(&self, employee_id: &str) -> Vec<AttendanceRecord> {
        self.records
            .read()
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect()
    }

    /// Returns the employee's session that has a clock-in but no clock-out.
    pub fn open_for(&self, employee_id: &str) -> Option<AttendanceRecord> {
        self.records
            .read()
            .values()
            .find(|r| r.employee_id == employee_id && r.is_open())
            .cloned()
    }
}
