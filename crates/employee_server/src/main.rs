//! `employee_server` binary entry point.
//!
//! Reads configuration from the environment, connects the store, then serves
//! HTTP until Ctrl-C or SIGTERM.

use std::process::ExitCode;

use employee_core::{flush_logging, init_logging};
use employee_server::config::ServerConfig;
use employee_server::server::{connect_store, run, EXIT_CONFIG_FAILURE};
use log::error;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            // Logging is configured from the same environment; report directly.
            eprintln!("{err}");
            return ExitCode::from(EXIT_CONFIG_FAILURE);
        }
    };

    if let Err(err) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::from(EXIT_CONFIG_FAILURE);
    }

    let store = match connect_store(&config.db_uri) {
        Ok(store) => store,
        Err(err) => {
            error!("event=store_connect module=server status=error error={err}");
            flush_logging();
            return ExitCode::from(err.exit_status());
        }
    };

    let exit_code = match run(&config, store).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_run module=server status=error error={err}");
            ExitCode::from(err.exit_status())
        }
    };
    flush_logging();
    exit_code
}
