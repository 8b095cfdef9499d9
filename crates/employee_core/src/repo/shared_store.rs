//! Process-wide store handle over a single SQLite connection.
//!
//! # Responsibility
//! - Own the one connection opened at startup and share it across threads.
//! - Expose the `EmployeeRepository` contract on a `Send + Sync` handle.
//!
//! # Invariants
//! - Each repository call holds the connection lock for exactly one statement
//!   sequence; no lock is held across calls.
//! - The connection is never closed or replaced through this handle.
//! - A panic while the lock is held does not disable the store: SQLite
//!   statements are atomic, so the next caller recovers the connection.

use crate::model::employee::{Employee, EmployeeChanges, EmployeeDraft, EmployeeId};
use crate::repo::employee_repo::{EmployeeRepository, RepoResult, SqliteEmployeeRepository};
use log::warn;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, PoisonError};

/// Cloneable handle to the shared employee connection.
#[derive(Clone)]
pub struct SharedEmployeeStore {
    conn: Arc<Mutex<Connection>>,
}

impl SharedEmployeeStore {
    /// Takes ownership of a migrated connection.
    ///
    /// # Errors
    /// - Same as [`SqliteEmployeeRepository::try_new`].
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        SqliteEmployeeRepository::try_new(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn with_repo<T>(
        &self,
        op: impl FnOnce(&SqliteEmployeeRepository<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let guard = self.conn.lock().unwrap_or_else(|poisoned| {
            warn!("event=store_lock module=repo status=recovered error_code=lock_poisoned");
            self.conn.clear_poison();
            PoisonError::into_inner(poisoned)
        });
        let repo = SqliteEmployeeRepository::from_checked(&guard);
        op(&repo)
    }
}

impl std::fmt::Debug for SharedEmployeeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedEmployeeStore").finish_non_exhaustive()
    }
}

impl EmployeeRepository for SharedEmployeeStore {
    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        self.with_repo(|repo| repo.list_employees())
    }

    fn find_employee(&self, id: &str) -> RepoResult<Option<Employee>> {
        self.with_repo(|repo| repo.find_employee(id))
    }

    fn insert_employee(&self, draft: &EmployeeDraft) -> RepoResult<EmployeeId> {
        self.with_repo(|repo| repo.insert_employee(draft))
    }

    fn update_employee(&self, id: &str, changes: &EmployeeChanges) -> RepoResult<u64> {
        self.with_repo(|repo| repo.update_employee(id, changes))
    }

    fn delete_employee(&self, id: &str) -> RepoResult<u64> {
        self.with_repo(|repo| repo.delete_employee(id))
    }
}
