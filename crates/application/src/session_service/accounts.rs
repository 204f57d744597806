use staffdeck_core::{AppError, AppResult};
use staffdeck_domain::User;

use crate::session_ports::{NewAccount, ProfileUpdate};

use super::{SessionService, no_active_session};

impl SessionService {
    /// Sends a partial profile update and applies the returned record to
    /// the active session.
    ///
    /// Requires an active session and at least one populated field; the
    /// refreshed snapshot is persisted with tokens unchanged, exactly as
    /// [`SessionService::update_user`] does.
    pub async fn update_profile(&self, update: ProfileUpdate) -> AppResult<User> {
        if update.is_empty() {
            return Err(AppError::Validation(
                "profile update has no fields to change".to_owned(),
            ));
        }
        let token = self.access_token().await.ok_or_else(no_active_session)?;

        let updated = self.auth_gateway.update_profile(&token, update).await?;
        self.update_user(updated.clone()).await?;
        Ok(updated)
    }

    /// Changes the password of the signed-in account.
    ///
    /// Passthrough to the authentication service; tokens and session state
    /// are unaffected by a password change.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let token = self.access_token().await.ok_or_else(no_active_session)?;

        self.auth_gateway
            .change_password(&token, current_password, new_password)
            .await
    }

    /// Creates a new user account on the authentication service.
    ///
    /// Used by privileged flows (staff onboarding); the current session is
    /// left untouched, whoever the new account belongs to.
    pub async fn register_account(&self, account: NewAccount) -> AppResult<User> {
        self.auth_gateway.register(account).await
    }
}
