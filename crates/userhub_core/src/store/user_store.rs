//! User store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide durable keyed storage for user records behind a trait seam.
//! - Own identifier assignment and timestamp stamping.
//! - Enforce login-name/email uniqueness atomically via schema constraints.
//!
//! # Invariants
//! - Write paths must call `User::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - `created_at` never changes after first persist; `updated_at` is
//!   refreshed on every successful write.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::user::{User, UserId, UserValidationError};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const USER_SELECT_SQL: &str = "SELECT
    id,
    created_at,
    updated_at,
    login_name,
    email_address,
    first_name,
    last_name
FROM users";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "created_at",
    "updated_at",
    "login_name",
    "email_address",
    "first_name",
    "last_name",
];

pub type StoreResult<T> = Result<T, StoreError>;

/// Key used for a lookup that can fail with `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserKey {
    Id(UserId),
    LoginName(String),
}

impl Display for UserKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::LoginName(name) => write!(f, "login name `{name}`"),
        }
    }
}

/// Semantic error vocabulary shared by the store and the service.
#[derive(Debug)]
pub enum StoreError {
    /// A required field is absent or fails format validation.
    MissingField(UserValidationError),
    /// No record matches the requested key.
    NotFound(UserKey),
    /// A write would violate uniqueness on `login_name` or `email_address`.
    Duplication { field: &'static str },
    Db(DbError),
    /// A persisted row no longer satisfies model validation.
    InvalidData(String),
    /// Connection schema version does not match this binary.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// External-provider import is declared by the contract but not
    /// supported by this core.
    ImportUnsupported { provider: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(err) => write!(f, "{err}"),
            Self::NotFound(key) => write!(f, "user not found: {key}"),
            Self::Duplication { field } => {
                write!(f, "user with the same {field} already exists")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted user data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::ImportUnsupported { provider } => {
                write!(f, "import from external provider `{provider}` is not supported")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingField(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UserValidationError> for StoreError {
    fn from(value: UserValidationError) -> Self {
        Self::MissingField(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract consumed by the user service.
///
/// The trait seam allows service tests to run against an in-memory fake
/// instead of a real database.
pub trait UserStore {
    /// Returns all users in store-defined (ascending id) order.
    fn get_all(&self) -> StoreResult<Vec<User>>;
    fn get_by_id(&self, id: UserId) -> StoreResult<User>;
    fn get_by_login_name(&self, login_name: &str) -> StoreResult<User>;
    /// Creates (id absent) or updates (id present) a record, returning the
    /// persisted state with identifier and timestamps populated.
    fn upsert(&self, user: &User) -> StoreResult<User>;
    fn delete(&self, id: UserId) -> StoreResult<()>;
    fn clear(&self) -> StoreResult<()>;
}

/// SQLite-backed user store.
pub struct SqliteUserStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserStore<'conn> {
    /// Wraps a connection after verifying its schema is usable.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` does not match
    ///   the latest migration known by this binary.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the `users`
    ///   schema is incomplete.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'users'
            );",
            [],
            |row| row.get(0),
        )?;
        if table_exists == 0 {
            return Err(StoreError::MissingRequiredTable("users"));
        }

        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('users');")?;
        let mut rows = stmt.query([])?;
        let mut columns = Vec::new();
        while let Some(row) = rows.next()? {
            columns.push(row.get::<_, String>(0)?);
        }
        for &column in REQUIRED_COLUMNS {
            if !columns.iter().any(|name| name.as_str() == column) {
                return Err(StoreError::MissingRequiredColumn {
                    table: "users",
                    column,
                });
            }
        }

        Ok(Self { conn })
    }

    fn fetch_by_id(&self, id: UserId) -> StoreResult<User> {
        let mut stmt = self.conn.prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return parse_user_row(row);
        }
        Err(StoreError::NotFound(UserKey::Id(id)))
    }
}

impl UserStore for SqliteUserStore<'_> {
    fn get_all(&self) -> StoreResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();

        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }

        Ok(users)
    }

    fn get_by_id(&self, id: UserId) -> StoreResult<User> {
        self.fetch_by_id(id)
    }

    fn get_by_login_name(&self, login_name: &str) -> StoreResult<User> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE login_name = ?1;"))?;
        let mut rows = stmt.query(params![login_name])?;
        if let Some(row) = rows.next()? {
            return parse_user_row(row);
        }
        Err(StoreError::NotFound(UserKey::LoginName(
            login_name.to_string(),
        )))
    }

    fn upsert(&self, user: &User) -> StoreResult<User> {
        user.validate()?;

        match user.id {
            None => {
                // 'now' is stable within one statement, so created_at and
                // updated_at start out equal.
                self.conn
                    .execute(
                        "INSERT INTO users (
                            created_at,
                            updated_at,
                            login_name,
                            email_address,
                            first_name,
                            last_name
                        ) VALUES (
                            (strftime('%s', 'now') * 1000),
                            (strftime('%s', 'now') * 1000),
                            ?1, ?2, ?3, ?4
                        );",
                        params![
                            user.login_name.as_str(),
                            user.email_address.as_str(),
                            user.first_name.as_str(),
                            user.last_name.as_str(),
                        ],
                    )
                    .map_err(map_constraint_violation)?;

                self.fetch_by_id(self.conn.last_insert_rowid())
            }
            Some(id) => {
                // Existence check and write are one statement; a zero-row
                // update means the id is gone and nothing was written.
                let changed = self
                    .conn
                    .execute(
                        "UPDATE users
                         SET
                            updated_at = (strftime('%s', 'now') * 1000),
                            login_name = ?1,
                            email_address = ?2,
                            first_name = ?3,
                            last_name = ?4
                         WHERE id = ?5;",
                        params![
                            user.login_name.as_str(),
                            user.email_address.as_str(),
                            user.first_name.as_str(),
                            user.last_name.as_str(),
                            id,
                        ],
                    )
                    .map_err(map_constraint_violation)?;

                if changed == 0 {
                    return Err(StoreError::NotFound(UserKey::Id(id)));
                }

                self.fetch_by_id(id)
            }
        }
    }

    fn delete(&self, id: UserId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", params![id])?;

        if changed == 0 {
            return Err(StoreError::NotFound(UserKey::Id(id)));
        }

        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.conn.execute("DELETE FROM users;", [])?;
        Ok(())
    }
}

fn parse_user_row(row: &Row<'_>) -> StoreResult<User> {
    let user = User {
        id: Some(row.get("id")?),
        created_at: Some(row.get("created_at")?),
        updated_at: Some(row.get("updated_at")?),
        login_name: row.get("login_name")?,
        email_address: row.get("email_address")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
    };

    if let Err(err) = user.validate() {
        return Err(StoreError::InvalidData(format!(
            "users row id {:?}: {err}",
            user.id
        )));
    }

    Ok(user)
}

fn map_constraint_violation(err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(sqlite_err, Some(message)) = &err {
        if sqlite_err.code == ErrorCode::ConstraintViolation {
            if message.contains("users.login_name") {
                return StoreError::Duplication {
                    field: "login_name",
                };
            }
            if message.contains("users.email_address") {
                return StoreError::Duplication {
                    field: "email_address",
                };
            }
        }
    }
    StoreError::Db(DbError::Sqlite(err))
}
