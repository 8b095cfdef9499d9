//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the five collection operations over `employees` storage.
//! - Parse identifier strings at the persistence boundary.
//!
//! # Invariants
//! - Absence is reported as data (`None`, or a zero count), never as an error.
//! - A malformed identifier is `RepoError::InvalidId`, distinct from absence.
//! - Read paths reject corrupt persisted rows instead of masking them.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::employee::{Employee, EmployeeChanges, EmployeeDraft, EmployeeId, EmployeeLevel};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    name,
    position,
    level
FROM employees";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for employee persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying database failure, including rejected writes.
    Db(DbError),
    /// Identifier string is not a valid store identifier.
    InvalidId(String),
    /// Persisted row cannot be mapped back to an `Employee`.
    InvalidData(String),
    /// Store handle is unusable.
    Connection(String),
}

impl RepoError {
    /// Returns whether the store refused a write because of document shape.
    pub fn is_rejected_write(&self) -> bool {
        match self {
            Self::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(failure, _))) => {
                failure.code == rusqlite::ErrorCode::ConstraintViolation
            }
            _ => false,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidId(message) => write!(f, "{message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
            Self::Connection(message) => write!(f, "{message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidId(_) => None,
            Self::InvalidData(_) => None,
            Self::Connection(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the employee collection.
///
/// Identifiers are passed as received from callers; implementations parse them.
pub trait EmployeeRepository {
    /// Returns every record in storage order.
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    /// Returns the record with `id`, or `None` when absent.
    fn find_employee(&self, id: &str) -> RepoResult<Option<Employee>>;
    /// Inserts a new record and returns its generated identifier.
    fn insert_employee(&self, draft: &EmployeeDraft) -> RepoResult<EmployeeId>;
    /// Sets the given fields and returns the matched record count.
    fn update_employee(&self, id: &str, changes: &EmployeeChanges) -> RepoResult<u64>;
    /// Deletes the record and returns the deleted record count.
    fn delete_employee(&self, id: &str) -> RepoResult<u64>;
}

/// Parses an identifier string into an `EmployeeId`.
pub fn parse_employee_id(id: &str) -> RepoResult<EmployeeId> {
    Uuid::parse_str(id).map_err(|err| {
        RepoError::InvalidId(format!(
            "invalid employee id `{id}`: input must be a UUID string ({err})"
        ))
    })
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Wraps a connection after checking its schema is ready.
    ///
    /// # Errors
    /// - `InvalidData` when the schema version or `employees` table is missing.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_employee_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Wraps a connection already checked by `try_new`.
    pub(crate) fn from_checked(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }

    fn find_employee(&self, id: &str) -> RepoResult<Option<Employee>> {
        let id = parse_employee_id(id)?;
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }

        Ok(None)
    }

    fn insert_employee(&self, draft: &EmployeeDraft) -> RepoResult<EmployeeId> {
        let id = Uuid::new_v4();

        self.conn.execute(
            "INSERT INTO employees (
                id,
                name,
                position,
                level
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                id.to_string(),
                draft.name.as_deref(),
                draft.position.as_deref(),
                draft.level.as_ref().map(EmployeeLevel::as_str),
            ],
        )?;

        Ok(id)
    }

    fn update_employee(&self, id: &str, changes: &EmployeeChanges) -> RepoResult<u64> {
        let id = parse_employee_id(id)?;

        if changes.is_empty() {
            let exists = self
                .conn
                .query_row(
                    "SELECT 1 FROM employees WHERE id = ?1;",
                    [id.to_string()],
                    |_| Ok(()),
                )
                .optional()?;
            return Ok(u64::from(exists.is_some()));
        }

        let matched = self.conn.execute(
            "UPDATE employees
             SET
                name = COALESCE(?2, name),
                position = COALESCE(?3, position),
                level = COALESCE(?4, level),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                id.to_string(),
                changes.name.as_deref(),
                changes.position.as_deref(),
                changes.level.as_ref().map(EmployeeLevel::as_str),
            ],
        )?;

        Ok(matched as u64)
    }

    fn delete_employee(&self, id: &str) -> RepoResult<u64> {
        let id = parse_employee_id(id)?;
        let deleted = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id.to_string()])?;

        Ok(deleted as u64)
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in employees.id"))
    })?;
    let level: String = row.get("level")?;

    Ok(Employee {
        id,
        name: row.get("name")?,
        position: row.get("position")?,
        level: EmployeeLevel::from(level),
    })
}

fn ensure_employee_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::InvalidData(format!(
            "connection schema version {actual_version} does not match expected {expected_version}"
        )));
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'employees'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::InvalidData(
            "required table `employees` is missing".to_string(),
        ));
    }

    Ok(())
}
