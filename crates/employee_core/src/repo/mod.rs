//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record store contract used by request handlers.
//! - Isolate SQLite query details from the HTTP layer.
//!
//! # Invariants
//! - "Not found" is returned as data (`None` or a zero count).
//! - Repository APIs surface DB transport errors and identifier parse errors
//!   as distinct `RepoError` variants.

pub mod employee_repo;
pub mod shared_store;
