//! Core domain logic for the employee records service.
//! This crate owns the record model and the record store adapter.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::employee::{Employee, EmployeeChanges, EmployeeDraft, EmployeeId, EmployeeLevel};
pub use repo::employee_repo::{
    parse_employee_id, EmployeeRepository, RepoError, RepoResult, SqliteEmployeeRepository,
};
pub use repo::shared_store::SharedEmployeeStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
