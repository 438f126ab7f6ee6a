//! User account domain model.
//!
//! # Responsibility
//! - Define the canonical user record and its required-field rules.
//! - Keep the create-vs-update decision unambiguous via optional `id`.
//!
//! # Invariants
//! - `id`, `created_at`, `updated_at` are populated by the store, never by
//!   callers; `None` means "not yet persisted".
//! - `login_name` and `email_address` are unique across all users (enforced
//!   by the store), and must pass `validate()` before any write.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier for a persisted user.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type UserId = i64;

static LOGIN_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("valid login name regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

/// Field-level validation failure for a user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// A required free-text field is absent or blank.
    MissingField { field: &'static str },
    /// Login name contains characters outside `[a-zA-Z0-9_.-]`.
    InvalidLoginName { value: String },
    /// Email address is not syntactically valid.
    InvalidEmailAddress { value: String },
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "required field `{field}` is missing"),
            Self::InvalidLoginName { value } => {
                write!(f, "login name `{value}` contains invalid characters")
            }
            Self::InvalidEmailAddress { value } => {
                write!(f, "email address `{value}` is invalid")
            }
        }
    }
}

impl Error for UserValidationError {}

/// Canonical user account record.
///
/// Timestamps are Unix epoch milliseconds. `created_at` is fixed at first
/// persist; `updated_at` is refreshed on every successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identity; `None` until the first persist.
    pub id: Option<UserId>,
    /// Set by the store on create, immutable afterwards.
    pub created_at: Option<i64>,
    /// Refreshed by the store on every successful persist.
    pub updated_at: Option<i64>,
    /// Unique human-chosen handle, distinct from the assigned `id`.
    pub login_name: String,
    /// Unique contact address.
    pub email_address: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    /// Creates an unpersisted user record.
    ///
    /// # Invariants
    /// - `id` and both timestamps start as `None`; the store fills them in.
    /// - Fields are not validated here; call `validate()` before persisting.
    pub fn new(
        login_name: impl Into<String>,
        email_address: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            created_at: None,
            updated_at: None,
            login_name: login_name.into(),
            email_address: email_address.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Returns whether this record already has a store-assigned identity.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Checks required-field presence and format constraints.
    ///
    /// # Contract
    /// - Violations are rejected, never coerced.
    /// - Write paths must call this before any SQL mutation.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.login_name.is_empty() {
            return Err(UserValidationError::MissingField {
                field: "login_name",
            });
        }
        if !LOGIN_NAME_RE.is_match(&self.login_name) {
            return Err(UserValidationError::InvalidLoginName {
                value: self.login_name.clone(),
            });
        }
        if self.email_address.is_empty() {
            return Err(UserValidationError::MissingField {
                field: "email_address",
            });
        }
        if !EMAIL_RE.is_match(&self.email_address) {
            return Err(UserValidationError::InvalidEmailAddress {
                value: self.email_address.clone(),
            });
        }
        if self.first_name.trim().is_empty() {
            return Err(UserValidationError::MissingField {
                field: "first_name",
            });
        }
        if self.last_name.trim().is_empty() {
            return Err(UserValidationError::MissingField { field: "last_name" });
        }
        Ok(())
    }
}
