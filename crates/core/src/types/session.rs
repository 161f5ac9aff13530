//! The signed-in session.

use secrecy::{ExposeSecret, SecretString};

use super::status::Role;

/// Session state: the bearer token (if signed in) and who it belongs to.
///
/// Construct with [`Session::anonymous`], [`Session::customer`] or
/// [`Session::admin`]; the constructors keep the admin role tied to a token.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<SecretString>,
    role: Role,
}

impl Session {
    /// No token, not an admin.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A general storefront session.
    #[must_use]
    pub const fn customer(token: SecretString) -> Self {
        Self {
            token: Some(token),
            role: Role::Customer,
        }
    }

    /// A session issued by the admin login.
    #[must_use]
    pub const fn admin(token: SecretString) -> Self {
        Self {
            token: Some(token),
            role: Role::Admin,
        }
    }

    /// The bearer token, if any.
    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// Role of the session. Always [`Role::Customer`] without a token.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|token| !token.expose_secret().is_empty())
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin && self.is_authenticated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_session() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert!(!session.is_admin());
        assert_eq!(session.role(), Role::Customer);
    }

    #[test]
    fn test_admin_requires_token() {
        let session = Session::admin(SecretString::from("t0ken".to_string()));
        assert!(session.is_admin());

        let blank = Session::admin(SecretString::from("".to_string()));
        assert!(!blank.is_authenticated());
        assert!(!blank.is_admin());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::customer(SecretString::from("very-private-value".to_string()));
        let debug = format!("{session:?}");
        assert!(!debug.contains("very-private-value"));
    }
}
