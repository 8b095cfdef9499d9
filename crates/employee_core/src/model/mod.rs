//! Employee domain model.
//!
//! # Responsibility
//! - Define canonical data structures shared by storage and HTTP layers.
//!
//! # Invariants
//! - Every persisted record is identified by a store-assigned `EmployeeId`.
//! - Deletion is a hard delete; no tombstones are kept.

pub mod employee;
