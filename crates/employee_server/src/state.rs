//! Shared state for employee handlers.

use std::sync::Arc;

use employee_core::{EmployeeRepository, SharedEmployeeStore};

/// Store handle shared by all concurrently running handlers.
pub type DynEmployeeStore = Arc<dyn EmployeeRepository + Send + Sync>;

/// Application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// The record store adapter.
    pub store: DynEmployeeStore,
}

impl AppState {
    /// Creates state around any repository implementation.
    #[must_use]
    pub fn new(store: DynEmployeeStore) -> Self {
        Self { store }
    }

    /// Creates state around the process-wide SQLite store.
    #[must_use]
    pub fn with_shared_store(store: SharedEmployeeStore) -> Self {
        Self::new(Arc::new(store))
    }
}
