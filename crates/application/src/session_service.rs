//! Session lifecycle application service.
//!
//! Single source of truth for "who is the current user". Owns login,
//! logout, optimistic bootstrap from the credential store, and local user
//! snapshot updates; no other component transitions session state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use staffdeck_core::{AppError, AppResult};
use staffdeck_domain::{Session, User};
use tokio::sync::RwLock;

use crate::session_ports::{AuthGateway, CredentialStore, LoginGrant};

mod accounts;


/// Lifecycle state of the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No user is signed in.
    Unauthenticated,
    /// A login attempt is in flight.
    Authenticating,
    /// A user is signed in under this session.
    Authenticated(Session),
}

/// Application service owning the current session.
///
/// Constructed per composition root with its two ports injected; tests
/// build isolated instances over fake adapters. Cloning shares the same
/// state holder.
#[derive(Clone)]
pub struct SessionService {
    credential_store: Arc<dyn CredentialStore>,
    auth_gateway: Arc<dyn AuthGateway>,
    state: Arc<RwLock<SessionState>>,
    login_serial: Arc<AtomicU64>,
}

impl SessionService {
    /// Creates a new session service in the unauthenticated state.
    #[must_use]
    pub fn new(
        credential_store: Arc<dyn CredentialStore>,
        auth_gateway: Arc<dyn AuthGateway>,
    ) -> Self {
        Self {
            credential_store,
            auth_gateway,
            state: Arc::new(RwLock::new(SessionState::Unauthenticated)),
            login_serial: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Restores a cached session from the credential store, if one exists.
    ///
    /// Optimistic: the cached token is not verified against the
    /// authentication service. A stale token surfaces later, as an auth
    /// failure on the first real request, and is the caller's concern.
    /// Missing or partial cache entries leave the state untouched.
    pub async fn bootstrap(&self) -> AppResult<Option<User>> {
        let Some(session) = self.credential_store.load().await? else {
            return Ok(None);
        };

        let user = session.user().clone();
        *self.state.write().await = SessionState::Authenticated(session);
        Ok(Some(user))
    }

    /// Exchanges credentials for a session.
    ///
    /// The attempt passes through `Authenticating`; on success the session
    /// is persisted and the state becomes `Authenticated`, on any failure
    /// it falls back to `Unauthenticated` with no persistence side effect.
    /// Gateway errors pass through unchanged so callers can present the
    /// service's own message. Non-emptiness of the inputs is the UI
    /// boundary's job, not enforced here.
    ///
    /// Each attempt carries a serial number; a response that is no longer
    /// the latest attempt is discarded without touching state or the store,
    /// and that caller receives a conflict error.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<User> {
        let attempt = self.login_serial.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.write().await = SessionState::Authenticating;

        let granted = self.auth_gateway.login(email, password).await;

        if self.login_serial.load(Ordering::SeqCst) != attempt {
            return Err(AppError::Conflict(
                "login attempt superseded by a newer attempt".to_owned(),
            ));
        }

        let outcome = match granted {
            Ok(grant) => self.establish(grant).await,
            Err(error) => Err(error),
        };

        match outcome {
            Ok(user) => Ok(user),
            Err(error) => {
                *self.state.write().await = SessionState::Unauthenticated;
                Err(error)
            }
        }
    }

    /// Signs out and clears the durable mirror.
    ///
    /// Valid from any state; signing out twice is a no-op success. The
    /// in-memory state drops before the store clear, so a failed clear can
    /// never leave the process signed in.
    pub async fn logout(&self) -> AppResult<()> {
        *self.state.write().await = SessionState::Unauthenticated;
        self.credential_store.clear().await
    }

    /// Replaces the user snapshot on the active session, tokens unchanged.
    ///
    /// Local cache update only: the caller is expected to have already
    /// changed server state and to pass the record the service returned.
    pub async fn update_user(&self, user: User) -> AppResult<()> {
        let mut state = self.state.write().await;
        let SessionState::Authenticated(session) = &*state else {
            return Err(no_active_session());
        };

        let refreshed = session.clone().with_user(user);
        self.credential_store.save(&refreshed).await?;
        *state = SessionState::Authenticated(refreshed);
        Ok(())
    }

    /// Returns a snapshot of the current lifecycle state.
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Returns the signed-in user, if any.
    pub async fn current_user(&self) -> Option<User> {
        match &*self.state.read().await {
            SessionState::Authenticated(session) => Some(session.user().clone()),
            SessionState::Unauthenticated | SessionState::Authenticating => None,
        }
    }

    /// Returns the bearer token of the active session, if any.
    pub async fn access_token(&self) -> Option<String> {
        match &*self.state.read().await {
            SessionState::Authenticated(session) => Some(session.access_token().to_owned()),
            SessionState::Unauthenticated | SessionState::Authenticating => None,
        }
    }

    /// Persists the granted session, then exposes it as the current state.
    ///
    /// Ordered so a caller never observes `Authenticated` together with an
    /// error return: if persistence fails, the login fails.
    async fn establish(&self, grant: LoginGrant) -> AppResult<User> {
        let session = Session::new(grant.access_token, Some(grant.refresh_token), grant.user)?;
        self.credential_store.save(&session).await?;

        let user = session.user().clone();
        *self.state.write().await = SessionState::Authenticated(session);
        Ok(user)
    }
}

fn no_active_session() -> AppError {
    AppError::Unauthorized("no active session".to_owned())
}
