use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use staffdeck_application::CredentialStore;
use staffdeck_core::{AppError, AppResult};
use staffdeck_domain::{Session, User};
use tokio::fs;

const ACCESS_TOKEN_FILE: &str = "access_token";
const REFRESH_TOKEN_FILE: &str = "refresh_token";
const USER_FILE: &str = "user.json";

/// Credential store backed by plain files in a local directory.
///
/// The session is spread over three entries: the access token, the optional
/// refresh token, and the cached user snapshot as JSON. A session is present
/// only when both the access token and the user snapshot load; anything
/// unreadable or corrupt is logged and treated as no session, never as an
/// error, so a damaged cache degrades to the logged-out state.
pub struct FileCredentialStore {
    directory: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store rooted at `directory`.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Creates a store under the platform configuration directory.
    pub fn in_user_config_dir() -> AppResult<Self> {
        let base = dirs::config_dir().ok_or_else(|| {
            AppError::Internal(
                "no configuration directory available for storing credentials".to_owned(),
            )
        })?;

        Ok(Self::new(base.join("staffdeck")))
    }

    fn entry_path(&self, file: &str) -> PathBuf {
        self.directory.join(file)
    }

    async fn read_entry(&self, file: &str) -> Option<String> {
        match fs::read_to_string(self.entry_path(file)).await {
            Ok(contents) => Some(contents),
            Err(error) if error.kind() == ErrorKind::NotFound => None,
            Err(error) => {
                tracing::warn!(file, %error, "unreadable credential entry, ignoring");
                None
            }
        }
    }

    async fn write_entry(&self, file: &str, contents: &str) -> AppResult<()> {
        let path = self.entry_path(file);
        fs::write(&path, contents).await.map_err(|error| {
            AppError::Internal(format!("failed to write credential entry '{file}': {error}"))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|error| {
                    AppError::Internal(format!(
                        "failed to restrict credential entry '{file}': {error}"
                    ))
                })?;
        }

        Ok(())
    }

    async fn remove_entry(&self, file: &str) -> AppResult<()> {
        match fs::remove_file(self.entry_path(file)).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(AppError::Internal(format!(
                "failed to remove credential entry '{file}': {error}"
            ))),
        }
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn save(&self, session: &Session) -> AppResult<()> {
        fs::create_dir_all(&self.directory).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to create credential directory '{}': {error}",
                self.directory.display()
            ))
        })?;

        let user_json = serde_json::to_string(session.user()).map_err(|error| {
            AppError::Internal(format!("failed to encode cached user record: {error}"))
        })?;

        // The user snapshot goes last: a save cut short leaves a token
        // without a snapshot, which `load` reads as no session at all.
        self.write_entry(ACCESS_TOKEN_FILE, session.access_token())
            .await?;
        match session.refresh_token() {
            Some(refresh_token) => self.write_entry(REFRESH_TOKEN_FILE, refresh_token).await?,
            None => self.remove_entry(REFRESH_TOKEN_FILE).await?,
        }
        self.write_entry(USER_FILE, &user_json).await
    }

    async fn load(&self) -> AppResult<Option<Session>> {
        let Some(access_token) = self.read_entry(ACCESS_TOKEN_FILE).await else {
            return Ok(None);
        };
        let Some(user_json) = self.read_entry(USER_FILE).await else {
            return Ok(None);
        };

        let user: User = match serde_json::from_str(&user_json) {
            Ok(user) => user,
            Err(error) => {
                tracing::warn!(%error, "corrupt cached user record, ignoring");
                return Ok(None);
            }
        };
        let refresh_token = self
            .read_entry(REFRESH_TOKEN_FILE)
            .await
            .map(|token| token.trim().to_owned())
            .filter(|token| !token.is_empty());

        match Session::new(access_token.trim(), refresh_token, user) {
            Ok(session) => Ok(Some(session)),
            Err(error) => {
                tracing::warn!(%error, "invalid cached session, ignoring");
                Ok(None)
            }
        }
    }

    async fn clear(&self) -> AppResult<()> {
        self.remove_entry(ACCESS_TOKEN_FILE).await?;
        self.remove_entry(REFRESH_TOKEN_FILE).await?;
        self.remove_entry(USER_FILE).await
    }
}
