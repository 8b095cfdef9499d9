//! HTTP surface for the employee records service.
//!
//! Maps `/employees` requests onto the record store adapter from
//! `employee_core` and store outcomes onto HTTP statuses and bodies.

pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use router::employee_router;
pub use server::{connect_store, run, serve, ServerError};
pub use state::{AppState, DynEmployeeStore};
