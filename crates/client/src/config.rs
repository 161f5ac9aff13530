//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `FIERCE_API_URL` - Backend API base URL (default: `http://127.0.0.1:5000/api/v1`)
//! - `FIERCE_SESSION_FILE` - Where the session is persisted
//!   (default: `<data dir>/fierce/session.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api/v1";

/// Session file name used when the platform has no data directory.
const FALLBACK_SESSION_FILE: &str = ".fierce-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every API path is appended to.
    pub api_url: Url,
    /// Path of the persisted session file.
    pub session_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("FIERCE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = parse_api_url(&raw_url)
            .map_err(|reason| ConfigError::InvalidEnvVar("FIERCE_API_URL".to_string(), reason))?;

        let session_file = match lookup("FIERCE_SESSION_FILE") {
            Some(path) if path.trim().is_empty() => {
                return Err(ConfigError::InvalidEnvVar(
                    "FIERCE_SESSION_FILE".to_string(),
                    "must not be empty".to_string(),
                ));
            }
            Some(path) => PathBuf::from(path),
            None => default_session_file(),
        };

        Ok(Self {
            api_url,
            session_file,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

/// Parse and normalize the API base URL.
///
/// The path always ends in `/` so that relative joins append to it instead of
/// replacing its last segment.
fn parse_api_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// `{data_dir}/fierce/session.json`, or a dotfile in the working directory.
fn default_session_file() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(FALLBACK_SESSION_FILE),
        |mut dir| {
            dir.push("fierce");
            dir.push("session.json");
            dir
        },
    )
}
