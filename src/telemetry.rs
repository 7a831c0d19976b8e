//! Tracing subscriber installation.

use thiserror::Error;
use tracing_subscriber::{EnvFilter, filter::ParseError};

/// Logging settings resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    filter: String,
    json: bool,
}

impl TelemetryConfig {
    /// Creates logging settings from a filter directive and output format.
    #[must_use]
    pub fn new(filter: impl Into<String>, json: bool) -> Self {
        Self {
            filter: filter.into(),
            json,
        }
    }

    /// Returns the default filter directive.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Returns `true` when events are written as JSON lines.
    #[must_use]
    pub const fn json(&self) -> bool {
        self.json
    }
}

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive does not parse.
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
}

/// Builds the event filter: `RUST_LOG` when set, else the configured directive.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured directive is
/// invalid.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    Ok(EnvFilter::try_new(config.filter())?)
}

/// Installs a stderr `fmt` subscriber.
///
/// Returns `false` when a global subscriber was already installed, which
/// leaves that subscriber in place.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured directive is
/// invalid.
pub fn init_tracing(config: &TelemetryConfig) -> Result<bool, TelemetryError> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if config.json() {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };
    Ok(installed)
}
