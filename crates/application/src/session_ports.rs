//! Ports for session persistence and the external authentication service.

use async_trait::async_trait;
use staffdeck_core::AppResult;
use staffdeck_domain::{Role, Session, User};

/// Durable client-local mirror of the active session.
///
/// Single-writer: only the session service writes to it. Reads are
/// idempotent and safe from any component that needs the cached identity.
/// The mirror has no independent authority; the in-memory session state
/// wins on any disagreement.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persists the session. Every entry is written before this returns, so
    /// a reader in the same process never observes a partial write.
    async fn save(&self, session: &Session) -> AppResult<()>;

    /// Returns the cached session when both a token and a user record are
    /// present and readable.
    ///
    /// Partial, missing, or corrupt state is absent, never an error: the
    /// store fails open to logged-out, not to an assumed identity.
    async fn load(&self) -> AppResult<Option<Session>>;

    /// Removes every entry. Clearing an empty store is a no-op success.
    async fn clear(&self) -> AppResult<()>;
}

/// Tokens and user snapshot issued by a successful login.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    /// Bearer token for authenticated requests.
    pub access_token: String,
    /// Refresh token stored alongside the session; never exercised here.
    pub refresh_token: String,
    /// The signed-in user.
    pub user: User,
}

/// Partial profile update sent to the authentication service.
///
/// `None` fields are omitted from the request so the service keeps their
/// current values. How the fields are spelled on the wire is up to the
/// gateway implementation.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement contact email.
    pub email: Option<String>,
    /// Replacement department label.
    pub department: Option<String>,
    /// Replacement avatar image reference.
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    /// Returns `true` when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.department.is_none()
            && self.avatar.is_none()
    }
}

/// Parameters for creating a new user account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Email address for the new account.
    pub email: String,
    /// Initial plaintext password; the service stores only a hash.
    pub password: String,
    /// Display name.
    pub name: String,
    /// Access role for the new account.
    pub role: Role,
    /// Department label.
    pub department: String,
}

/// Client port for the external authentication service.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchanges credentials for tokens and a user snapshot.
    ///
    /// A rejection arrives as `AppError::Unauthorized` carrying the most
    /// specific message the service reported; an unreachable service or a
    /// malformed response arrives as `AppError::Transport`.
    async fn login(&self, email: &str, password: &str) -> AppResult<LoginGrant>;

    /// Applies a partial profile update; returns the updated record.
    async fn update_profile(&self, access_token: &str, update: ProfileUpdate) -> AppResult<User>;

    /// Changes the password of the account the token belongs to.
    async fn change_password(
        &self,
        access_token: &str,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()>;

    /// Creates a new user account; returns the created record.
    async fn register(&self, account: NewAccount) -> AppResult<User>;
}
