//! Layered client configuration.
//!
//! Values are resolved from built-in defaults, then an optional TOML file,
//! then `TASKBOARD_*` environment variables, each layer overriding the last.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::telemetry::TelemetryConfig;

/// Default API root, matching the development server.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default directory holding the persisted session token.
pub const DEFAULT_TOKEN_DIR: &str = ".taskboard";
/// Default tracing directive.
pub const DEFAULT_LOG_FILTER: &str = "taskboard=info";
/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "TASKBOARD_";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    #[error("failed to read configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// The API URL is not an absolute http(s) URL.
    #[error("invalid API URL {url:?}: {reason}")]
    InvalidApiUrl {
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request timeout is zero.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct RawConfig {
    api_url: String,
    timeout_secs: u64,
    token_dir: String,
    log_filter: String,
    log_json: bool,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_dir: DEFAULT_TOKEN_DIR.to_owned(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_json: false,
        }
    }
}

/// Validated client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_url: Url,
    timeout: Duration,
    token_dir: Utf8PathBuf,
    telemetry: TelemetryConfig,
}

impl ClientConfig {
    /// Loads defaults, the optional TOML file and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source is unreadable or a value fails
    /// validation.
    pub fn load(config_file: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment(config_file))
    }

    /// Builds the layered provider without extracting it.
    #[must_use]
    pub fn figment(config_file: Option<&Utf8Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(RawConfig::default()));
        if let Some(path) = config_file {
            debug!(path = %path, "reading configuration file");
            figment = figment.merge(Toml::file_exact(path.as_std_path()));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extracts and validates configuration from any provider.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when extraction or validation fails.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let raw: RawConfig = figment.extract().map_err(Box::new)?;
        let api_url = parse_api_url(&raw.api_url)?;
        if raw.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Self {
            api_url,
            timeout: Duration::from_secs(raw.timeout_secs),
            token_dir: Utf8PathBuf::from(raw.token_dir),
            telemetry: TelemetryConfig::new(raw.log_filter, raw.log_json),
        })
    }

    /// Returns the API root.
    #[must_use]
    pub const fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the directory holding the session token.
    #[must_use]
    pub fn token_dir(&self) -> &Utf8Path {
        &self.token_dir
    }

    /// Returns logging settings.
    #[must_use]
    pub const fn telemetry(&self) -> &TelemetryConfig {
        &self.telemetry
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidApiUrl {
        url: raw.to_owned(),
        reason,
    };
    let url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".to_owned()));
    }
    Ok(url)
}
