mod commands;
mod console;
pub mod core;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::core::error::InstallerResult;
use crate::core::state::AppState;

/// Used when `RUST_LOG` is unset. Progress shares the terminal, so only
/// this crate logs at `info`.
const DEFAULT_LOG_FILTER: &str = "warn,studio_installer_lib=info";

pub fn run() -> ExitCode {
    // Logs go to stderr so stdout stays a clean display.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Studio installer starting...");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Cannot start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(session());

    // The stdin reader lives on a blocking thread that never returns on its own.
    runtime.shutdown_timeout(Duration::from_millis(200));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error during initialization: {:?}", e);
            eprintln!("Error during initialization: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn session() -> InstallerResult<()> {
    let working_dir = std::env::current_dir()?;
    let state = Arc::new(AppState::new(working_dir)?);
    console::run_session(state).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_filter_is_valid() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
