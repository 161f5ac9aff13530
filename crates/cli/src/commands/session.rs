//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! # Store a storefront session
//! fierce login --token "$TOKEN"
//!
//! # Store an admin session (token issued by the admin login)
//! FIERCE_TOKEN="$ADMIN_TOKEN" fierce login --admin
//!
//! fierce whoami
//! fierce logout
//! ```

use fierce_client::ClientConfig;
use fierce_core::{Route, routing};
use secrecy::{ExposeSecret, SecretString};

use super::{CommandError, open_session};

/// Store a session token.
///
/// # Errors
///
/// Returns `CommandError::MissingToken` for a blank token, or
/// `CommandError::Store` if the session cannot be written.
pub fn login(
    config: &ClientConfig,
    token: Option<SecretString>,
    admin: bool,
) -> Result<Route, CommandError> {
    let token = token
        .filter(|token| !token.expose_secret().trim().is_empty())
        .ok_or(CommandError::MissingToken)?;

    let session = open_session(config)?;
    session.set_session(&token, admin)?;

    let landing = Route::home(&session.load());
    tracing::info!(
        role = %session.load().role(),
        "Logged in; continue at {landing}"
    );
    Ok(landing)
}

/// Clear the stored session.
///
/// # Errors
///
/// Returns `CommandError::Store` if the session cannot be written.
pub fn logout(config: &ClientConfig) -> Result<Route, CommandError> {
    open_session(config)?.clear_session()?;
    tracing::info!("Logged out; continue at {}", Route::Login);
    Ok(Route::Login)
}

/// Report the stored session.
///
/// # Errors
///
/// Returns `CommandError::Store` if the session file is unreadable.
pub fn whoami(config: &ClientConfig) -> Result<(), CommandError> {
    let session = open_session(config)?.load();
    if session.is_authenticated() {
        tracing::info!("Signed in as {}", session.role());
    } else {
        tracing::info!("Not signed in");
    }
    let routes = routing::allowed_routes(&session)
        .iter()
        .map(|route| route.path())
        .collect::<Vec<_>>()
        .join(", ");
    tracing::info!("Reachable routes: {routes}");
    Ok(())
}
