use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{directive}'")]
    InvalidFilter {
        directive: String,
        #[source]
        source: ParseError,
    },
    #[error("unable to install the log subscriber: {0}")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Picks the filter directive: `--verbose` wins, then `RUST_LOG`, then the
/// configured level.
fn filter_for(config: &TelemetryConfig, verbose: bool) -> Result<EnvFilter, TelemetryError> {
    let build = |value: &str| {
        EnvFilter::try_new(value).map_err(|source| TelemetryError::InvalidFilter {
            directive: value.to_string(),
            source,
        })
    };

    if verbose {
        return build("debug");
    }
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => build(&config.log_level),
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout carries only
/// the report.
pub fn init(config: &TelemetryConfig, verbose: bool) -> Result<(), TelemetryError> {
    let env_filter = filter_for(config, verbose)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Install)
}
