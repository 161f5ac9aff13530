//! Route gate commands.

use fierce_client::ClientConfig;
use fierce_core::{Navigation, Route, routing};

use super::{CommandError, open_session};

/// Resolve a path against the stored session, as the app does on navigation.
///
/// # Errors
///
/// Returns `CommandError::Store` if the session file is unreadable.
pub fn navigate(config: &ClientConfig, path: &str) -> Result<Navigation, CommandError> {
    let session = open_session(config)?.load();
    let navigation = routing::resolve(path, &session);
    match navigation {
        Navigation::Render(route) => tracing::info!("{path} -> render {route}"),
        Navigation::Redirect(route) => tracing::info!("{path} -> redirect {route}"),
    }
    Ok(navigation)
}

/// Print where every known route lands for the stored session.
///
/// # Errors
///
/// Returns `CommandError::Store` if the session file is unreadable.
pub fn routes(config: &ClientConfig) -> Result<(), CommandError> {
    let session = open_session(config)?.load();
    for route in Route::ALL {
        match routing::resolve(route.path(), &session) {
            Navigation::Render(_) => tracing::info!("{:<18} ok", route.path()),
            Navigation::Redirect(target) => {
                tracing::info!("{:<18} -> {target}", route.path());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_without_session_redirects_dashboard_to_products() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json").display().to_string();
        let config =
            ClientConfig::from_lookup(|key| (key == "FIERCE_SESSION_FILE").then(|| path.clone()))
                .unwrap();

        let navigation = navigate(&config, "/admin-dashboard").unwrap();

        assert_eq!(navigation, Navigation::Redirect(Route::Products));
    }
}
