//! Staffdeck console client.
//!
//! One process per interaction: every invocation restores the cached session
//! first, runs a single subcommand, and exits.

#![forbid(unsafe_code)]

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use staffdeck_application::{
    GateDecision, NewAccount, ProfileUpdate, SessionService, navigation, route,
};
use staffdeck_core::{AppError, AppResult, NonEmptyString};
use staffdeck_domain::{Role, ViewId};
use staffdeck_infrastructure::{FileCredentialStore, HttpAuthGateway};
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone)]
struct ConsoleConfig {
    api_base_url: String,
    credentials_dir: Option<PathBuf>,
    http_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let sessions = build_session_service(&config)?;

    if let Some(user) = sessions.bootstrap().await? {
        info!(user = %user.email(), role = %user.role(), "restored cached session");
    }

    let arguments: Vec<String> = env::args().skip(1).collect();
    run_command(&sessions, &arguments).await
}

async fn run_command(sessions: &SessionService, arguments: &[String]) -> AppResult<()> {
    let Some(command) = arguments.first().map(String::as_str) else {
        print_usage();
        return Ok(());
    };

    match command {
        "login" => login(sessions, &arguments[1..]).await,
        "logout" => logout(sessions).await,
        "whoami" => whoami(sessions).await,
        "views" => list_views(sessions).await,
        "open" => open_view(sessions, &arguments[1..]).await,
        "update-profile" => update_profile(sessions, &arguments[1..]).await,
        "change-password" => change_password(sessions).await,
        "register" => register(sessions, &arguments[1..]).await,
        other => {
            print_usage();
            Err(AppError::Validation(format!("unknown command '{other}'")))
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn login(sessions: &SessionService, arguments: &[String]) -> AppResult<()> {
    let email = NonEmptyString::new(single_argument(arguments, "login <email>")?)?;
    let password = required_env("STAFFDECK_PASSWORD")?;

    let user = sessions.login(email.as_str(), &password).await?;
    println!("Signed in as {} ({})", user.name(), user.role());

    render_view(sessions, ViewId::Dashboard.as_str()).await
}

async fn logout(sessions: &SessionService) -> AppResult<()> {
    sessions.logout().await?;
    println!("Signed out.");
    Ok(())
}

async fn whoami(sessions: &SessionService) -> AppResult<()> {
    let Some(user) = sessions.current_user().await else {
        println!("Not signed in.");
        return Ok(());
    };

    println!("{} <{}>", user.name(), user.email());
    println!("role: {}", user.role());
    if !user.department().is_empty() {
        println!("department: {}", user.department());
    }
    if let Some(avatar) = user.avatar() {
        println!("avatar: {avatar}");
    }
    Ok(())
}

async fn list_views(sessions: &SessionService) -> AppResult<()> {
    let Some(user) = sessions.current_user().await else {
        println!("Not signed in. Run `staffdeck-console login <email>` first.");
        return Ok(());
    };

    println!("Views available to {} ({}):", user.name(), user.role());
    for view in navigation(&user) {
        println!("  {:<20} {}", view.as_str(), view.title());
    }
    Ok(())
}

async fn open_view(sessions: &SessionService, arguments: &[String]) -> AppResult<()> {
    let selection = single_argument(arguments, "open <view>")?;
    render_view(sessions, selection).await
}

async fn update_profile(sessions: &SessionService, arguments: &[String]) -> AppResult<()> {
    let update = parse_profile_update(arguments)?;
    let user = sessions.update_profile(update).await?;

    println!("Profile updated for {} <{}>", user.name(), user.email());
    Ok(())
}

async fn change_password(sessions: &SessionService) -> AppResult<()> {
    let current_password = required_env("STAFFDECK_PASSWORD")?;
    let new_password = required_env("STAFFDECK_NEW_PASSWORD")?;

    sessions
        .change_password(&current_password, &new_password)
        .await?;
    println!("Password changed.");
    Ok(())
}

async fn register(sessions: &SessionService, arguments: &[String]) -> AppResult<()> {
    let password = required_env("STAFFDECK_PASSWORD")?;
    let account = parse_new_account(arguments, password)?;

    let created = sessions.register_account(account).await?;
    println!(
        "Account created for {} <{}> ({})",
        created.name(),
        created.email(),
        created.role()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

async fn render_view(sessions: &SessionService, selection: &str) -> AppResult<()> {
    let user = sessions.current_user().await;
    let routed = route(user.as_ref(), selection);

    match routed.decision {
        GateDecision::Granted => {
            println!("== {} ==", routed.view.title());
            if let Some(user) = &user {
                println!("Signed in as {} ({})", user.name(), user.role());
            }
        }
        GateDecision::Hidden => {
            println!("Not signed in. Run `staffdeck-console login <email>` first.");
        }
        GateDecision::Denied {
            current_role,
            required_roles,
        } => {
            println!("Access Denied");
            println!("You don't have permission to access this resource");
            println!("Your current role: {current_role}");
            println!("Required roles: {}", join_roles(required_roles));
        }
    }
    Ok(())
}

fn join_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_usage() {
    println!("usage: staffdeck-console <command>");
    println!();
    println!("commands:");
    println!("  login <email>            sign in; password from STAFFDECK_PASSWORD");
    println!("  logout                   drop the cached session");
    println!("  whoami                   show the signed-in user");
    println!("  views                    list views available to the signed-in user");
    println!("  open <view>              open a view by its id, e.g. `open payroll`");
    println!("  update-profile k=v ...   change name, email, department or avatar");
    println!("  change-password          rotate the password; reads STAFFDECK_PASSWORD");
    println!("                           and STAFFDECK_NEW_PASSWORD");
    println!("  register k=v ...         create an account; fields email=, name=,");
    println!("                           role=, department=; password from STAFFDECK_PASSWORD");
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

fn single_argument<'a>(arguments: &'a [String], usage: &str) -> AppResult<&'a str> {
    match arguments {
        [value] => Ok(value.as_str()),
        _ => Err(AppError::Validation(format!(
            "usage: staffdeck-console {usage}"
        ))),
    }
}

fn split_assignment(argument: &str) -> AppResult<(&str, &str)> {
    argument.split_once('=').ok_or_else(|| {
        AppError::Validation(format!("expected field=value, got '{argument}'"))
    })
}

fn parse_profile_update(arguments: &[String]) -> AppResult<ProfileUpdate> {
    let mut update = ProfileUpdate::default();

    for argument in arguments {
        let (field, value) = split_assignment(argument)?;
        let value: String = NonEmptyString::new(value)?.into();
        match field {
            "name" => update.name = Some(value),
            "email" => update.email = Some(value),
            "department" => update.department = Some(value),
            "avatar" => update.avatar = Some(value),
            other => {
                return Err(AppError::Validation(format!(
                    "unknown profile field '{other}'"
                )));
            }
        }
    }

    Ok(update)
}

fn parse_new_account(arguments: &[String], password: String) -> AppResult<NewAccount> {
    let mut email: Option<String> = None;
    let mut name: Option<String> = None;
    let mut role = Role::Employee;
    let mut department = String::new();

    for argument in arguments {
        let (field, value) = split_assignment(argument)?;
        match field {
            "email" => email = Some(NonEmptyString::new(value)?.into()),
            "name" => name = Some(NonEmptyString::new(value)?.into()),
            "role" => role = value.parse()?,
            "department" => department = value.to_owned(),
            other => {
                return Err(AppError::Validation(format!(
                    "unknown account field '{other}'"
                )));
            }
        }
    }

    let email = email.ok_or_else(|| {
        AppError::Validation("register requires email=<address>".to_owned())
    })?;
    let name = name.ok_or_else(|| {
        AppError::Validation("register requires name=<display name>".to_owned())
    })?;

    Ok(NewAccount {
        email,
        password,
        name,
        role,
        department,
    })
}

// ---------------------------------------------------------------------------
// Configuration and wiring
// ---------------------------------------------------------------------------

impl ConsoleConfig {
    fn load() -> AppResult<Self> {
        let api_base_url = env::var("STAFFDECK_API_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000".to_owned());
        let api_base_url = Url::parse(&api_base_url)
            .map_err(|error| {
                AppError::Validation(format!(
                    "invalid STAFFDECK_API_BASE_URL '{api_base_url}': {error}"
                ))
            })?
            .to_string()
            .trim_end_matches('/')
            .to_owned();

        let credentials_dir = env::var("STAFFDECK_CREDENTIALS_DIR")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let http_timeout_secs = parse_env_u64("STAFFDECK_HTTP_TIMEOUT_SECS", 15)?;
        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "STAFFDECK_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url,
            credentials_dir,
            http_timeout_secs,
        })
    }
}

fn build_session_service(config: &ConsoleConfig) -> AppResult<SessionService> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    let credential_store = match &config.credentials_dir {
        Some(directory) => FileCredentialStore::new(directory),
        None => FileCredentialStore::in_user_config_dir()?,
    };
    let auth_gateway = HttpAuthGateway::new(http_client, &config.api_base_url);

    Ok(SessionService::new(
        Arc::new(credential_store),
        Arc::new(auth_gateway),
    ))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}
