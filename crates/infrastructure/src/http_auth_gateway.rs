use async_trait::async_trait;
use reqwest::{StatusCode, header};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use staffdeck_application::{AuthGateway, LoginGrant, NewAccount, ProfileUpdate};
use staffdeck_core::{AppError, AppResult};
use staffdeck_domain::{Role, User, UserId};

/// HTTP client for the hosted directory and authentication service.
pub struct HttpAuthGateway {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpAuthGateway {
    /// Creates a gateway for the service rooted at `base_url`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, email: &str, password: &str) -> AppResult<LoginGrant> {
        let response = self
            .http_client
            .post(self.endpoint("/api/auth/login/"))
            .json(&LoginRequestBody { email, password })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = read_body(response).await;
        if !status.is_success() {
            // Credential rejections and validation problems alike surface as
            // a refused login carrying the service's own message.
            return Err(AppError::Unauthorized(extract_error_message(
                status, &body,
            )));
        }

        let grant: LoginResponseBody =
            serde_json::from_str(&body).map_err(malformed_response)?;
        Ok(LoginGrant {
            access_token: grant.access,
            refresh_token: grant.refresh,
            user: grant.user.into_user()?,
        })
    }

    async fn update_profile(&self, access_token: &str, update: ProfileUpdate) -> AppResult<User> {
        let response = self
            .http_client
            .patch(self.endpoint("/api/auth/update-profile/"))
            .header(header::AUTHORIZATION, bearer(access_token))
            .json(&ProfileUpdateBody::from_update(&update))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = read_body(response).await;
        if !status.is_success() {
            return Err(error_for_status(status, &body));
        }

        let payload: UserPayload = serde_json::from_str(&body).map_err(malformed_response)?;
        payload.into_user()
    }

    async fn change_password(
        &self,
        access_token: &str,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let response = self
            .http_client
            .post(self.endpoint("/api/auth/change-password/"))
            .header(header::AUTHORIZATION, bearer(access_token))
            .json(&ChangePasswordRequestBody {
                current_password,
                new_password,
            })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = read_body(response).await;
        Err(error_for_status(status, &body))
    }

    async fn register(&self, account: NewAccount) -> AppResult<User> {
        let response = self
            .http_client
            .post(self.endpoint("/api/auth/register/"))
            .json(&RegisterRequestBody::from_account(&account))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = read_body(response).await;
        if !status.is_success() {
            return Err(error_for_status(status, &body));
        }

        let created: RegisterResponseBody =
            serde_json::from_str(&body).map_err(malformed_response)?;
        created.user.into_user()
    }
}

// ---------------------------------------------------------------------------
// Wire bodies
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct LoginRequestBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponseBody {
    user: UserPayload,
    access: String,
    refresh: String,
}

#[derive(Serialize)]
struct ChangePasswordRequestBody<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

/// Profile changes as the service spells them.
///
/// The service models names as `first_name`/`last_name` pairs, so a replaced
/// display name is split on whitespace before it goes out.
#[derive(Serialize)]
struct ProfileUpdateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    department: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar: Option<&'a str>,
}

impl<'a> ProfileUpdateBody<'a> {
    fn from_update(update: &'a ProfileUpdate) -> Self {
        let (first_name, last_name) = match update.name.as_deref() {
            Some(name) => {
                let (first, last) = split_display_name(name);
                (Some(first), Some(last))
            }
            None => (None, None),
        };

        Self {
            first_name,
            last_name,
            email: update.email.as_deref(),
            department: update.department.as_deref(),
            avatar: update.avatar.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct RegisterRequestBody<'a> {
    username: &'a str,
    email: &'a str,
    first_name: String,
    last_name: String,
    role: &'a str,
    department: &'a str,
    password: &'a str,
}

impl<'a> RegisterRequestBody<'a> {
    fn from_account(account: &'a NewAccount) -> Self {
        let (first_name, last_name) = split_display_name(&account.name);

        Self {
            // The service requires a login name distinct from the email
            // address; the local part is unique enough for directory use.
            username: account.email.split('@').next().unwrap_or(&account.email),
            email: &account.email,
            first_name,
            last_name,
            role: account.role.as_str(),
            department: &account.department,
            password: &account.password,
        }
    }
}

#[derive(Deserialize)]
struct RegisterResponseBody {
    user: UserPayload,
}

/// User record as the service serializes it.
#[derive(Deserialize)]
struct UserPayload {
    id: UserId,
    name: Option<String>,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: String,
    role: String,
    department: Option<String>,
    avatar: Option<String>,
}

impl UserPayload {
    /// Converts the wire record into the domain snapshot.
    ///
    /// A role outside the known set means the payload cannot be trusted, so
    /// the whole response is treated as malformed.
    fn into_user(self) -> AppResult<User> {
        let role = self.role.parse::<Role>().map_err(|_| {
            AppError::Transport(format!(
                "authentication service returned unknown role '{}'",
                self.role
            ))
        })?;
        let name = self.display_name();
        let department = self.department.unwrap_or_default();

        Ok(User::new(
            self.id, name, self.email, role, department, self.avatar,
        ))
    }

    /// Derives the display name.
    ///
    /// The service has no single name field: records carry a first/last pair
    /// and a login name. Preference order is an explicit `name`, then the
    /// first/last pair, then the login name, then the email address.
    fn display_name(&self) -> String {
        if let Some(name) = non_blank(self.name.as_deref()) {
            return name.to_owned();
        }

        let full_name = [
            non_blank(self.first_name.as_deref()),
            non_blank(self.last_name.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
        if !full_name.is_empty() {
            return full_name;
        }

        match non_blank(self.username.as_deref()) {
            Some(username) => username.to_owned(),
            None => self.email.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bearer(access_token: &str) -> String {
    format!("Bearer {access_token}")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

fn split_display_name(name: &str) -> (String, String) {
    let mut words = name.split_whitespace();
    let first = words.next().unwrap_or_default().to_owned();
    let last = words.collect::<Vec<_>>().join(" ");

    (first, last)
}

fn transport_error(error: reqwest::Error) -> AppError {
    AppError::Transport(format!("authentication service unreachable: {error}"))
}

fn malformed_response(error: serde_json::Error) -> AppError {
    AppError::Transport(format!(
        "authentication service returned a malformed payload: {error}"
    ))
}

async fn read_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "<response body unavailable>".to_owned())
}

/// Maps a non-success status onto the error taxonomy, carrying the message
/// extracted from the response body.
fn error_for_status(status: StatusCode, body: &str) -> AppError {
    let message = extract_error_message(status, body);

    match status {
        StatusCode::BAD_REQUEST => AppError::Validation(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        _ => AppError::Internal(message),
    }
}

/// Pulls a human-readable message out of a service error body.
///
/// The service spreads messages across several shapes depending on the
/// endpoint and failure: `detail` and `error` carry plain strings, while
/// per-field validation errors arrive as string arrays keyed by field. The
/// first populated slot wins; bodies that are not JSON fall back to the
/// status line.
fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "error"] {
            if let Some(message) = payload.get(key).and_then(Value::as_str) {
                return message.to_owned();
            }
        }

        for key in ["non_field_errors", "email", "password"] {
            let first = payload
                .get(key)
                .and_then(Value::as_array)
                .and_then(|messages| messages.first())
                .and_then(Value::as_str);
            if let Some(message) = first {
                return message.to_owned();
            }
        }
    }

    status.canonical_reason().map_or_else(
        || format!("HTTP status {}", status.as_u16()),
        str::to_owned,
    )
}

#[cfg(test)]
mod tests;
