pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod placement;
pub mod telemetry;

mod cli;
mod commands;

use error::AppError;

/// Entry point used by the binary: parses arguments, loads configuration,
/// installs logging and dispatches the chosen command.
pub fn run() -> Result<(), AppError> {
    cli::run()
}
