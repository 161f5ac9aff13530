//! Session/token store.
//!
//! The single owner of persisted authentication state. Views and the API
//! client receive a [`SessionStore`] handle instead of reading storage keys
//! themselves.
//!
//! # Storage layout
//!
//! | Key          | Value                                  |
//! |--------------|----------------------------------------|
//! | `token`      | bearer token of the current session    |
//! | `adminToken` | same token, only for admin sessions    |
//! | `isAdmin`    | `"true"` for admin sessions, else absent |
//!
//! The three keys are always written and cleared in one batch.

mod store;

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use fierce_core::Session;

pub use store::{Change, FileStore, KeyValueStore, MemoryStore, StoreError};

/// Storage keys.
pub mod keys {
    /// General session token.
    pub const TOKEN: &str = "token";

    /// Admin session token.
    pub const ADMIN_TOKEN: &str = "adminToken";

    /// Admin flag, `"true"` when set.
    pub const IS_ADMIN: &str = "isAdmin";
}

/// Which token a call needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Any signed-in session (storefront calls).
    General,
    /// Only a session issued by the admin login (dashboard calls).
    Admin,
}

/// Cloneable handle over the persisted session.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Wrap a key-value backend.
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// A session that lives only in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Read the session, unifying the storage keys.
    ///
    /// The token is `token`, falling back to `adminToken` for sessions written
    /// by older clients that only set the admin key.
    #[must_use]
    pub fn load(&self) -> Session {
        let token = self
            .backend
            .get(keys::TOKEN)
            .or_else(|| self.backend.get(keys::ADMIN_TOKEN))
            .filter(|token| !token.is_empty())
            .map(SecretString::from);
        let admin_flag = self.backend.get(keys::IS_ADMIN).as_deref() == Some("true");

        match token {
            Some(token) if admin_flag => Session::admin(token),
            Some(token) => Session::customer(token),
            None => Session::anonymous(),
        }
    }

    /// Token for a call of the given kind, if the session may make it.
    #[must_use]
    pub fn get_token(&self, kind: TokenKind) -> Option<SecretString> {
        let session = self.load();
        match kind {
            TokenKind::General => session.token().cloned(),
            TokenKind::Admin if session.is_admin() => session.token().cloned(),
            TokenKind::Admin => None,
        }
    }

    /// Store a new session, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the session could not be persisted.
    pub fn set_session(&self, token: &SecretString, is_admin: bool) -> Result<(), StoreError> {
        let token = token.expose_secret();
        let batch: [Change<'_>; 3] = if is_admin {
            [
                (keys::TOKEN, Some(token)),
                (keys::ADMIN_TOKEN, Some(token)),
                (keys::IS_ADMIN, Some("true")),
            ]
        } else {
            [
                (keys::TOKEN, Some(token)),
                (keys::ADMIN_TOKEN, None),
                (keys::IS_ADMIN, None),
            ]
        };
        self.backend.apply(&batch)?;
        tracing::info!(admin = is_admin, "Session stored");
        Ok(())
    }

    /// Remove every session key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the removal could not be persisted.
    pub fn clear_session(&self) -> Result<(), StoreError> {
        self.backend.apply(&[
            (keys::TOKEN, None),
            (keys::ADMIN_TOKEN, None),
            (keys::IS_ADMIN, None),
        ])?;
        tracing::info!("Session cleared");
        Ok(())
    }
}
