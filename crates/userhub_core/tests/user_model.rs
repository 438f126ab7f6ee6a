use userhub_core::{User, UserValidationError};

#[test]
fn user_new_starts_unpersisted() {
    let user = User::new("alice01", "alice@example.com", "Alice", "A");

    assert_eq!(user.id, None);
    assert_eq!(user.created_at, None);
    assert_eq!(user.updated_at, None);
    assert_eq!(user.login_name, "alice01");
    assert_eq!(user.email_address, "alice@example.com");
    assert!(!user.is_persisted());
}

#[test]
fn validate_accepts_well_formed_user() {
    let user = User::new("bob_2.d-e", "bob.builder+test@mail.example.org", "Bob", "Builder");
    assert!(user.validate().is_ok());
}

#[test]
fn validate_rejects_login_name_with_invalid_characters() {
    for login_name in ["alice 01", "alice!", "älice", "a/b"] {
        let user = User::new(login_name, "alice@example.com", "Alice", "A");
        let err = user.validate().unwrap_err();
        assert_eq!(
            err,
            UserValidationError::InvalidLoginName {
                value: login_name.to_string(),
            },
            "login name `{login_name}` should be rejected"
        );
    }
}

#[test]
fn validate_rejects_empty_login_name_as_missing_field() {
    let user = User::new("", "alice@example.com", "Alice", "A");
    assert_eq!(
        user.validate().unwrap_err(),
        UserValidationError::MissingField {
            field: "login_name",
        }
    );
}

#[test]
fn validate_rejects_malformed_email_address() {
    for email in ["not-an-email", "alice@", "@example.com", "alice@host"] {
        let user = User::new("alice01", email, "Alice", "A");
        let err = user.validate().unwrap_err();
        assert_eq!(
            err,
            UserValidationError::InvalidEmailAddress {
                value: email.to_string(),
            },
            "email `{email}` should be rejected"
        );
    }
}

#[test]
fn validate_rejects_blank_names_as_missing_fields() {
    let user = User::new("alice01", "alice@example.com", "  ", "A");
    assert_eq!(
        user.validate().unwrap_err(),
        UserValidationError::MissingField {
            field: "first_name",
        }
    );

    let user = User::new("alice01", "alice@example.com", "Alice", "");
    assert_eq!(
        user.validate().unwrap_err(),
        UserValidationError::MissingField { field: "last_name" }
    );
}

#[test]
fn user_serialization_uses_expected_wire_fields() {
    let mut user = User::new("alice01", "alice@example.com", "Alice", "A");
    user.id = Some(42);
    user.created_at = Some(1_700_000_000_000);
    user.updated_at = Some(1_700_000_360_000);

    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["id"], 42);
    assert_eq!(json["created_at"], 1_700_000_000_000_i64);
    assert_eq!(json["updated_at"], 1_700_000_360_000_i64);
    assert_eq!(json["login_name"], "alice01");
    assert_eq!(json["email_address"], "alice@example.com");
    assert_eq!(json["first_name"], "Alice");
    assert_eq!(json["last_name"], "A");

    let decoded: User = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, user);
}

#[test]
fn unpersisted_user_serializes_null_identity() {
    let user = User::new("alice01", "alice@example.com", "Alice", "A");

    let json = serde_json::to_value(&user).unwrap();
    assert!(json["id"].is_null());
    assert!(json["created_at"].is_null());
    assert!(json["updated_at"].is_null());
}
