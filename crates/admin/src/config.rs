//! Environment-driven configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Errors loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for environment variable {name}: {message}")]
    InvalidEnvVar { name: String, message: String },
}

/// Runtime configuration for the admin panel.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Base URL of the store API, e.g. `http://localhost:5000`.
    pub api_base_url: Url,
    /// Bind host. Defaults to localhost; the panel sits behind the VPN.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Where the admin session is persisted between restarts.
    pub session_file: PathBuf,
    /// How often the background task refreshes the review feed.
    pub review_poll_interval: Duration,
    /// Sentry DSN; error reporting is disabled when unset.
    pub sentry_dsn: Option<String>,
    /// Fraction of error events sent to Sentry.
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry.
    pub sentry_traces_sample_rate: f32,
    /// Deployment environment name, reported to Sentry.
    pub environment: String,
}

impl AdminConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does
    /// not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = parse_env_value("LOOMWORKS_API_BASE_URL", Url::parse)?;

        let review_poll_secs: u64 = parse_default("REVIEW_POLL_SECS", "30", str::parse)?;
        if review_poll_secs == 0 {
            return Err(ConfigError::InvalidEnvVar {
                name: "REVIEW_POLL_SECS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            api_base_url,
            host: get_env_or_default("HOST", "127.0.0.1"),
            port: parse_default("PORT", "3001", str::parse)?,
            session_file: PathBuf::from(get_env_or_default(
                "LOOMWORKS_SESSION_FILE",
                ".loomworks-session.json",
            )),
            review_poll_interval: Duration::from_secs(review_poll_secs),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_sample_rate: parse_default("SENTRY_SAMPLE_RATE", "1.0", str::parse)?,
            sentry_traces_sample_rate: parse_default("SENTRY_TRACES_SAMPLE_RATE", "0.1", str::parse)?,
            environment: get_env_or_default("APP_ENV", "development"),
        })
    }

    /// The address to bind the HTTP listener to.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port do not form a valid address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidEnvVar {
                name: "HOST".to_string(),
                message: e.to_string(),
            })
    }
}

fn get_required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn get_optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn get_env_or_default(name: &str, default: &str) -> String {
    get_optional_env(name).unwrap_or_else(|| default.to_string())
}

/// Parse a required variable with `parse`.
fn parse_env_value<T, E, F>(name: &str, parse: F) -> Result<T, ConfigError>
where
    E: std::fmt::Display,
    F: FnOnce(&str) -> Result<T, E>,
{
    let raw = get_required_env(name)?;
    parse_value(name, &raw, parse)
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_default<T, E, F>(name: &str, default: &str, parse: F) -> Result<T, ConfigError>
where
    E: std::fmt::Display,
    F: FnOnce(&str) -> Result<T, E>,
{
    let raw = get_env_or_default(name, default);
    parse_value(name, &raw, parse)
}

/// Map a parse failure to the variable name so the startup error says which
/// value was wrong.
fn parse_value<T, E, F>(name: &str, raw: &str, parse: F) -> Result<T, ConfigError>
where
    E: std::fmt::Display,
    F: FnOnce(&str) -> Result<T, E>,
{
    parse(raw).map_err(|e| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        message: e.to_string(),
    })
}
