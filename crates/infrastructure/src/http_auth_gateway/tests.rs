use serde_json::json;
use staffdeck_application::{NewAccount, ProfileUpdate};
use staffdeck_core::AppError;
use staffdeck_domain::Role;

use super::{
    ProfileUpdateBody, RegisterRequestBody, StatusCode, UserPayload, error_for_status,
    extract_error_message, split_display_name,
};

fn payload_from(value: serde_json::Value) -> UserPayload {
    let Ok(payload) = serde_json::from_value::<UserPayload>(value) else {
        panic!("user payload did not deserialize");
    };

    payload
}

// -------------------------------------------------------------------------
// Error message extraction
// -------------------------------------------------------------------------

#[test]
fn detail_takes_priority_over_other_slots() {
    let body = json!({
        "detail": "No active account found with the given credentials",
        "error": "shadowed",
        "non_field_errors": ["shadowed"],
    })
    .to_string();

    assert_eq!(
        extract_error_message(StatusCode::UNAUTHORIZED, &body),
        "No active account found with the given credentials"
    );
}

#[test]
fn error_slot_is_used_when_detail_is_absent() {
    let body = json!({ "error": "Current password is incorrect" }).to_string();

    assert_eq!(
        extract_error_message(StatusCode::BAD_REQUEST, &body),
        "Current password is incorrect"
    );
}

#[test]
fn field_error_arrays_are_scanned_in_order() {
    let ranked = json!({
        "non_field_errors": ["Invalid credentials."],
        "email": ["Enter a valid email address."],
    })
    .to_string();
    let email_only = json!({ "email": ["Enter a valid email address."] }).to_string();
    let password_only = json!({ "password": ["This field may not be blank."] }).to_string();

    assert_eq!(
        extract_error_message(StatusCode::BAD_REQUEST, &ranked),
        "Invalid credentials."
    );
    assert_eq!(
        extract_error_message(StatusCode::BAD_REQUEST, &email_only),
        "Enter a valid email address."
    );
    assert_eq!(
        extract_error_message(StatusCode::BAD_REQUEST, &password_only),
        "This field may not be blank."
    );
}

#[test]
fn non_json_bodies_fall_back_to_the_status_line() {
    assert_eq!(
        extract_error_message(StatusCode::UNAUTHORIZED, "<html>nope</html>"),
        "Unauthorized"
    );

    let bare = StatusCode::from_u16(599).unwrap_or_else(|_| panic!("status"));
    assert_eq!(extract_error_message(bare, "{}"), "HTTP status 599");
}

#[test]
fn statuses_map_onto_the_error_taxonomy() {
    let body = json!({ "detail": "m" }).to_string();

    assert!(matches!(
        error_for_status(StatusCode::BAD_REQUEST, &body),
        AppError::Validation(_)
    ));
    assert!(matches!(
        error_for_status(StatusCode::UNAUTHORIZED, &body),
        AppError::Unauthorized(_)
    ));
    assert!(matches!(
        error_for_status(StatusCode::FORBIDDEN, &body),
        AppError::Forbidden(_)
    ));
    assert!(matches!(
        error_for_status(StatusCode::NOT_FOUND, &body),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        error_for_status(StatusCode::INTERNAL_SERVER_ERROR, &body),
        AppError::Internal(_)
    ));
}

// -------------------------------------------------------------------------
// User payload mapping
// -------------------------------------------------------------------------

#[test]
fn display_name_is_built_from_the_name_pair() {
    let payload = payload_from(json!({
        "id": 7,
        "username": "lena.f",
        "first_name": "Lena",
        "last_name": "Fuchs",
        "email": "lena@example.com",
        "role": "manager",
        "department": "Engineering",
        "avatar": null,
    }));

    let user = payload.into_user();
    assert!(
        matches!(user, Ok(user) if user.name() == "Lena Fuchs" && user.id().as_str() == "7")
    );
}

#[test]
fn display_name_falls_back_to_username_then_email() {
    let from_username = payload_from(json!({
        "id": "8",
        "username": "omar.h",
        "first_name": "",
        "email": "omar@example.com",
        "role": "employee",
    }));
    let from_email = payload_from(json!({
        "id": "9",
        "email": "ana@example.com",
        "role": "employee",
    }));

    assert!(matches!(from_username.into_user(), Ok(user) if user.name() == "omar.h"));
    assert!(matches!(from_email.into_user(), Ok(user) if user.name() == "ana@example.com"));
}

#[test]
fn explicit_name_wins_over_the_pair() {
    let payload = payload_from(json!({
        "id": 1,
        "name": "Dr. Priya Sharma",
        "first_name": "Priya",
        "last_name": "Sharma",
        "email": "priya@example.com",
        "role": "admin",
    }));

    assert!(matches!(payload.into_user(), Ok(user) if user.name() == "Dr. Priya Sharma"));
}

#[test]
fn unknown_role_is_a_malformed_payload() {
    let payload = payload_from(json!({
        "id": 2,
        "email": "root@example.com",
        "role": "superuser",
    }));

    assert!(matches!(payload.into_user(), Err(AppError::Transport(_))));
}

#[test]
fn missing_department_becomes_empty() {
    let payload = payload_from(json!({
        "id": 3,
        "email": "sam@example.com",
        "role": "employee",
    }));

    assert!(matches!(payload.into_user(), Ok(user) if user.department().is_empty()));
}

// -------------------------------------------------------------------------
// Request body shaping
// -------------------------------------------------------------------------

#[test]
fn display_name_splits_into_the_wire_pair() {
    assert_eq!(
        split_display_name("Ana de Souza"),
        ("Ana".to_owned(), "de Souza".to_owned())
    );
    assert_eq!(split_display_name("Cher"), ("Cher".to_owned(), String::new()));
}

#[test]
fn profile_body_omits_untouched_fields() {
    let update = ProfileUpdate {
        name: Some("Ana de Souza".to_owned()),
        ..ProfileUpdate::default()
    };

    let body = serde_json::to_value(ProfileUpdateBody::from_update(&update));
    let Ok(body) = body else {
        panic!("profile body did not serialize");
    };

    assert_eq!(body.get("first_name").and_then(|v| v.as_str()), Some("Ana"));
    assert_eq!(
        body.get("last_name").and_then(|v| v.as_str()),
        Some("de Souza")
    );
    assert!(body.get("email").is_none());
    assert!(body.get("department").is_none());
    assert!(body.get("avatar").is_none());
}

#[test]
fn empty_profile_update_serializes_to_an_empty_object() {
    let body = serde_json::to_value(ProfileUpdateBody::from_update(&ProfileUpdate::default()));

    assert!(matches!(body, Ok(value) if value == json!({})));
}

#[test]
fn register_body_derives_the_login_name_from_the_email() {
    let account = NewAccount {
        email: "lena.fuchs@example.com".to_owned(),
        password: "s3cret".to_owned(),
        name: "Lena Fuchs".to_owned(),
        role: Role::Manager,
        department: "Engineering".to_owned(),
    };

    let body = serde_json::to_value(RegisterRequestBody::from_account(&account));
    let Ok(body) = body else {
        panic!("register body did not serialize");
    };

    assert_eq!(
        body.get("username").and_then(|v| v.as_str()),
        Some("lena.fuchs")
    );
    assert_eq!(body.get("first_name").and_then(|v| v.as_str()), Some("Lena"));
    assert_eq!(body.get("last_name").and_then(|v| v.as_str()), Some("Fuchs"));
    assert_eq!(body.get("role").and_then(|v| v.as_str()), Some("manager"));
}
