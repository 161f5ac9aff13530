//! Command implementations.

pub mod admin;
pub mod catalog;
pub mod navigate;
pub mod session;

use fierce_client::{ApiClient, ClientConfig, ClientError, ConfigError, FileStore, SessionStore, StoreError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The session file could not be read or written.
    #[error("Session error: {0}")]
    Store(#[from] StoreError),

    /// A client operation failed; the message is what a user would see.
    #[error("{0}")]
    Client(String),

    /// `login` was run without a token.
    #[error("No token given. Pass --token or set FIERCE_TOKEN.")]
    MissingToken,
}

/// Open the persisted session named by the configuration.
///
/// # Errors
///
/// Returns `CommandError::Store` if the session file is unreadable.
pub fn open_session(config: &ClientConfig) -> Result<SessionStore, CommandError> {
    Ok(SessionStore::new(FileStore::open(&config.session_file)?))
}

/// Build an API client over the persisted session.
///
/// # Errors
///
/// Returns `CommandError` if the session or HTTP client cannot be set up.
pub fn api_client(config: &ClientConfig) -> Result<ApiClient, CommandError> {
    let session = open_session(config)?;
    ApiClient::new(config, session).map_err(|err| CommandError::Client(err.to_string()))
}

/// Convert a view-level failure into the inline message it produced.
pub(crate) fn reported(err: &ClientError, message: Option<String>) -> CommandError {
    CommandError::Client(message.unwrap_or_else(|| err.to_string()))
}
