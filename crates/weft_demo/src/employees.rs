//! In-memory employee directory.
//!
//! Every operation goes through the dispatcher under the `employees` target,
//! so registered advice observes lookups, saves, and deletes without the
//! directory knowing about any of it.

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;
use weft_advice::{CallError, Dispatcher, OperationInfo};

/// An employee record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    /// Unique employee id.
    pub id: i64,
}

/// In-memory employee directory routed through the dispatcher.
pub struct EmployeeDirectory {
    dispatcher: Arc<Dispatcher>,
    records: RwLock<HashMap<i64, Employee>>,
}

impl EmployeeDirectory {
    /// Target component name used in operation metadata.
    pub const TARGET: &'static str = "employees";

    /// Creates an empty directory dispatching through `dispatcher`.
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Looks up an employee by id.
    ///
    /// Returns the stored record when one was saved, otherwise a fresh record
    /// for the id.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `id` is the `-1` sentinel.
    pub fn find_by_id(&self, id: i64) -> Result<Employee, CallError> {
        self.dispatcher.invoke_with_args(
            OperationInfo::new(Self::TARGET, "find_by_id"),
            vec![id.to_string()],
            || {
                tracing::info!(id, "employee lookup");
                if id == -1 {
                    return Err(CallError::InvalidArgument("id cannot be -1".to_owned()));
                }
                Ok(self
                    .records
                    .read()
                    .get(&id)
                    .cloned()
                    .unwrap_or(Employee { id }))
            },
        )
    }

    /// Stores an employee record, replacing any previous one with the same id.
    ///
    /// # Errors
    ///
    /// Propagates advice failures; the store itself cannot fail.
    pub fn save(&self, employee: Employee) -> Result<(), CallError> {
        self.dispatcher.invoke_with_args(
            OperationInfo::new(Self::TARGET, "save"),
            vec![employee.id.to_string()],
            || {
                tracing::info!(id = employee.id, "saving employee");
                self.records.write().insert(employee.id, employee);
                Ok(())
            },
        )
    }

    /// Removes the record with the given id, if present.
    ///
    /// # Errors
    ///
    /// Propagates advice failures; removal itself cannot fail.
    pub fn delete(&self, id: i64) -> Result<(), CallError> {
        self.dispatcher.invoke_with_args(
            OperationInfo::new(Self::TARGET, "delete"),
            vec![id.to_string()],
            || {
                tracing::info!(id, "deleting employee");
                self.records.write().remove(&id);
                Ok(())
            },
        )
    }

    /// True when a record with `id` has been saved.
    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.records.read().contains_key(&id)
    }
}
