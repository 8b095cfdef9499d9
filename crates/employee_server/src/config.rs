//! Environment-driven server configuration.
//!
//! # Responsibility
//! - Read the store connection string, listen address and logging settings.
//! - Reject unusable values before any resource is opened.
//!
//! # Invariants
//! - Blank variables are treated as absent.
//! - The connection string is mandatory; everything else has a default.

use employee_core::default_log_level;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

pub const DB_URI_ENV: &str = "EMPLOYEES_DB_URI";
pub const PORT_ENV: &str = "PORT";
pub const BIND_ADDR_ENV: &str = "EMPLOYEES_BIND_ADDR";
pub const LOG_LEVEL_ENV: &str = "EMPLOYEES_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "EMPLOYEES_LOG_DIR";

pub const DEFAULT_PORT: u16 = 5200;
pub const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Configuration error raised during startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no {0} provided in config")]
    Missing(&'static str),
    #[error("invalid {key} value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Server settings resolved at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Store connection string.
    pub db_uri: String,
    pub bind_addr: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Absolute directory for rotating log files; stderr only when `None`.
    pub log_dir: Option<String>,
}

impl ServerConfig {
    /// Builds a config with defaults for everything but the connection string.
    pub fn new(db_uri: impl Into<String>) -> Self {
        Self {
            db_uri: db_uri.into(),
            bind_addr: DEFAULT_BIND_ADDR,
            port: DEFAULT_PORT,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }

    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    /// - `ConfigError::Missing` when the connection string is absent.
    /// - `ConfigError::Invalid` when the port or bind address do not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_uri = read(DB_URI_ENV).ok_or(ConfigError::Missing(DB_URI_ENV))?;
        let mut config = Self::new(db_uri);

        if let Some(port) = read(PORT_ENV) {
            config.port = port.parse::<u16>().map_err(|err| ConfigError::Invalid {
                key: PORT_ENV,
                value: port.clone(),
                reason: err.to_string(),
            })?;
        }
        if let Some(addr) = read(BIND_ADDR_ENV) {
            config.bind_addr = addr.parse::<IpAddr>().map_err(|err| ConfigError::Invalid {
                key: BIND_ADDR_ENV,
                value: addr.clone(),
                reason: err.to_string(),
            })?;
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        config.log_dir = read(LOG_DIR_ENV);

        Ok(config)
    }

    /// Returns the address the HTTP listener binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}
