//! Process bootstrap: store connection, listener, serving and shutdown.
//!
//! # Invariants
//! - No listener is bound until the store connection is established.
//! - Startup failures map to distinct process exit codes.

use std::net::SocketAddr;

use employee_core::db::open_db_from_uri;
use employee_core::{RepoError, SharedEmployeeStore};
use log::{error, info};
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::router::employee_router;
use crate::state::AppState;

pub const EXIT_SERVER_FAILURE: u8 = 1;
pub const EXIT_CONFIG_FAILURE: u8 = 2;
pub const EXIT_STORE_FAILURE: u8 = 3;

/// Startup or serving failure.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to connect to database: {0}")]
    Store(#[source] RepoError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl ServerError {
    /// Returns the process exit status for this failure.
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::Store(_) => EXIT_STORE_FAILURE,
            Self::Bind { .. } | Self::Serve(_) => EXIT_SERVER_FAILURE,
        }
    }
}

/// Opens the store named by `db_uri` and wraps it for sharing.
///
/// # Errors
/// - `ServerError::Store` when the connection string is invalid, the database
///   cannot be opened, or its schema is unusable.
pub fn connect_store(db_uri: &str) -> Result<SharedEmployeeStore, ServerError> {
    let conn = open_db_from_uri(db_uri).map_err(|err| ServerError::Store(err.into()))?;
    let store = SharedEmployeeStore::try_new(conn).map_err(ServerError::Store)?;
    info!("event=store_connect module=server status=ok");
    Ok(store)
}

/// Binds the configured address and serves until a shutdown signal.
pub async fn run(config: &ServerConfig, store: SharedEmployeeStore) -> Result<(), ServerError> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    serve(listener, AppState::with_shared_store(store), shutdown_signal()).await
}

/// Serves the router on an already bound listener until `shutdown` resolves.
///
/// In-flight requests finish before this returns.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let local_addr = listener.local_addr().map_err(ServerError::Serve)?;
    info!(
        "event=server_start module=server status=ok addr=http://{local_addr} version={}",
        env!("CARGO_PKG_VERSION")
    );

    let result = axum::serve(listener, employee_router(state))
        .with_graceful_shutdown(shutdown)
        .await;

    match result {
        Ok(()) => {
            info!("event=server_stop module=server status=ok addr={local_addr}");
            Ok(())
        }
        Err(err) => {
            error!("event=server_stop module=server status=error addr={local_addr} error={err}");
            Err(ServerError::Serve(err))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("event=signal_install module=server status=error signal=ctrl_c error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(
                    "event=signal_install module=server status=error signal=sigterm error={err}"
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("event=shutdown_signal module=server status=ok");
}
