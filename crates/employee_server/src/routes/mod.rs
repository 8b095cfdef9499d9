//! Route handlers for the employee service.

pub mod employees;
pub mod health;
