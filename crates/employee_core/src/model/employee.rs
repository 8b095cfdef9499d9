//! Employee domain model.
//!
//! # Responsibility
//! - Define the persisted employee record and its HTTP-facing shape.
//! - Define the create (`EmployeeDraft`) and set-fields (`EmployeeChanges`)
//!   input shapes accepted by the repository.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes afterwards.
//! - `level` is a closed set at the API boundary, but unknown values are kept
//!   verbatim (`EmployeeLevel::Unrecognized`) so they round-trip unchanged.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Store-assigned identifier of an employee record.
pub type EmployeeId = Uuid;

/// Seniority of an employee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmployeeLevel {
    Junior,
    Mid,
    Senior,
    /// Any value outside the known set, stored as received.
    Unrecognized(String),
}

impl EmployeeLevel {
    /// Returns the stored text form of this level.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Junior => "junior",
            Self::Mid => "mid",
            Self::Senior => "senior",
            Self::Unrecognized(value) => value.as_str(),
        }
    }

    /// Returns whether this level is one of `junior|mid|senior`.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for EmployeeLevel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "junior" => Self::Junior,
            "mid" => Self::Mid,
            "senior" => Self::Senior,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<&str> for EmployeeLevel {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<EmployeeLevel> for String {
    fn from(value: EmployeeLevel) -> Self {
        match value {
            EmployeeLevel::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for EmployeeLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub position: String,
    pub level: EmployeeLevel,
}

/// Body of a create request. The store assigns `id`.
///
/// A missing field reaches the store as NULL and is rejected there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub level: Option<EmployeeLevel>,
}

impl EmployeeDraft {
    /// Builds a draft with every field present.
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        level: impl Into<EmployeeLevel>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            position: Some(position.into()),
            level: Some(level.into()),
        }
    }
}

/// Fields to set on an existing record. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub level: Option<EmployeeLevel>,
}

impl EmployeeChanges {
    /// Returns whether no field would be changed.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.position.is_none() && self.level.is_none()
    }
}
