//! Employee directory collaborator seam.
//!
//! The workflow engine consults the directory only at submission time (to
//! freeze the supervisor and check active status) and in the list read
//! model (department filter). Later organizational changes never alter an
//! in-flight request's approver.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use talio_shared::types::EmployeeId;

/// Directory record for a single employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique identifier.
    pub id: EmployeeId,
    /// The employee's direct supervisor, if any.
    pub supervisor_id: Option<EmployeeId>,
    /// Department code (e.g. "ENG").
    pub department: String,
    /// Whether the employee is active (not terminated).
    pub active: bool,
}

/// Lookup seam for the external employee directory.
pub trait EmployeeDirectory: Send + Sync {
    /// Finds an employee by id.
    fn find(&self, id: EmployeeId) -> Option<EmployeeRecord>;
}

/// In-memory directory for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    employees: RwLock<HashMap<EmployeeId, EmployeeRecord>>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an employee record.
    pub fn upsert(&self, record: EmployeeRecord) {
        if let Ok(mut employees) = self.employees.write() {
            employees.insert(record.id, record);
        }
    }
}

impl EmployeeDirectory for MemoryDirectory {
    fn find(&self, id: EmployeeId) -> Option<EmployeeRecord> {
        self.employees.read().ok()?.get(&id).cloned()
    }
}
