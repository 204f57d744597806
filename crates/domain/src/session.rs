//! Session types tying a bearer credential to a user snapshot.

use serde::{Deserialize, Serialize};
use staffdeck_core::{AppError, AppResult};

use crate::user::User;

/// Live association between a bearer credential and the user it represents.
///
/// A session is created on successful login or restored from the credential
/// store at startup, and destroyed on logout. It is never partially valid:
/// the access token and the user snapshot exist and disappear together. The
/// refresh token is optional because a restored session may predate it; it
/// is stored and cleared alongside the rest but never exercised here (no
/// token refresh in this client).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    access_token: String,
    refresh_token: Option<String>,
    user: User,
}

impl Session {
    /// Creates a session from an issued token pair and user snapshot.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        user: User,
    ) -> AppResult<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(AppError::Validation(
                "access token must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            access_token,
            refresh_token,
            user,
        })
    }

    /// Returns the bearer access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.access_token.as_str()
    }

    /// Returns the refresh token, when one was issued with this session.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Returns the user this credential represents.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Returns the same credential carrying a replaced user snapshot.
    ///
    /// Used when the user edits their own profile: tokens are unchanged.
    #[must_use]
    pub fn with_user(mut self, user: User) -> Self {
        self.user = user;
        self
    }

    /// Consumes the session and returns the user snapshot.
    #[must_use]
    pub fn into_user(self) -> User {
        self.user
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::user::{Role, User, UserId};

    fn sample_user(role: Role) -> User {
        let id = UserId::new("3").unwrap_or_else(|_| panic!("test id"));
        User::new(id, "Omar Haddad", "omar@example.com", role, "Finance", None)
    }

    #[test]
    fn empty_access_token_is_rejected() {
        let session = Session::new("", None, sample_user(Role::Employee));
        assert!(session.is_err());
    }

    #[test]
    fn with_user_keeps_tokens() {
        let session = Session::new("tok1", Some("ref1".to_owned()), sample_user(Role::Employee));
        let Ok(session) = session else {
            panic!("session construction failed");
        };

        let replaced = session.with_user(sample_user(Role::Manager));
        assert_eq!(replaced.access_token(), "tok1");
        assert_eq!(replaced.refresh_token(), Some("ref1"));
        assert_eq!(replaced.user().role(), Role::Manager);
    }
}
