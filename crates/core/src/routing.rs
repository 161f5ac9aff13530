//! Client-side route gate.
//!
//! Decides, for every navigation, which screen is reachable for the current
//! session. The gate is a pure function of the path and the session; callers
//! load the session freshly for each navigation so that a login or logout takes
//! effect on the next one.
//!
//! ```text
//! /admin-dashboard  admin      -> render
//!                   otherwise  -> redirect /products
//! /                 admin      -> redirect /admin-dashboard
//!                   otherwise  -> redirect /products
//! <unknown>                    -> same as /
//! <any other route>            -> render
//! ```

use serde::{Deserialize, Serialize};

use crate::types::Session;

/// A screen of the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Products,
    Cart,
    CreateAccount,
    Order,
    Login,
    AdminLogin,
    AdminDashboard,
}

impl Route {
    /// Every route, in menu order.
    pub const ALL: [Self; 7] = [
        Self::Products,
        Self::Cart,
        Self::CreateAccount,
        Self::Order,
        Self::Login,
        Self::AdminLogin,
        Self::AdminDashboard,
    ];

    /// The URL path of the route.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Products => "/products",
            Self::Cart => "/cart",
            Self::CreateAccount => "/create-account",
            Self::Order => "/order",
            Self::Login => "/login",
            Self::AdminLogin => "/admin/login",
            Self::AdminDashboard => "/admin-dashboard",
        }
    }

    /// Match a path exactly against the known routes.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    /// Whether the route renders only for admin sessions.
    #[must_use]
    pub const fn requires_admin(self) -> bool {
        matches!(self, Self::AdminDashboard)
    }

    /// Landing route for a session: the dashboard for admins, the catalog
    /// for everyone else.
    #[must_use]
    pub fn home(session: &Session) -> Self {
        if session.is_admin() {
            Self::AdminDashboard
        } else {
            Self::Products
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "route", rename_all = "snake_case")]
pub enum Navigation {
    /// The requested screen is shown.
    Render(Route),
    /// The user is sent elsewhere.
    Redirect(Route),
}

impl Navigation {
    /// The route that ends up on screen.
    #[must_use]
    pub const fn route(self) -> Route {
        match self {
            Self::Render(route) | Self::Redirect(route) => route,
        }
    }

    #[must_use]
    pub const fn is_redirect(self) -> bool {
        matches!(self, Self::Redirect(_))
    }
}

/// Resolve a navigation request for `session`.
#[must_use]
pub fn resolve(path: &str, session: &Session) -> Navigation {
    let path = normalize(path);
    match Route::from_path(path) {
        Some(route) if route.requires_admin() && !session.is_admin() => {
            Navigation::Redirect(Route::Products)
        }
        Some(route) => Navigation::Render(route),
        None => Navigation::Redirect(Route::home(session)),
    }
}

/// Every route that renders for `session`.
#[must_use]
pub fn allowed_routes(session: &Session) -> Vec<Route> {
    Route::ALL
        .into_iter()
        .filter(|route| !route.requires_admin() || session.is_admin())
        .collect()
}

/// Drop query string, fragment and a single trailing slash.
fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = path.get(..end).unwrap_or(path);
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    }
}
