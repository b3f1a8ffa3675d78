pub mod memory;
pub mod users;

use async_trait::async_trait;

use crate::models::{NewUser, User};

pub use memory::MemoryUserStore;
pub use users::PgUserStore;

#[derive(Debug)]
pub enum StoreError {
    /// A unique column already holds this value. `field` is `None` when the
    /// violated constraint could not be mapped back to a column.
    Conflict { field: Option<&'static str> },
    /// No further `user_id` values can be assigned.
    IdsExhausted,
    Database(sqlx::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Conflict { field: Some(field) } => {
                write!(f, "A user with this {field} already exists")
            }
            StoreError::Conflict { field: None } => write!(f, "User already exists"),
            StoreError::IdsExhausted => write!(f, "User id sequence exhausted"),
            StoreError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict {
                    field: unique_field(db_err.constraint()),
                }
            }
            _ => StoreError::Database(err),
        }
    }
}

fn unique_field(constraint: Option<&str>) -> Option<&'static str> {
    match constraint? {
        "users_username_key" => Some("username"),
        "users_phone_key" => Some("phone"),
        "users_email_key" => Some("email"),
        _ => None,
    }
}

/// Persistence for the `users` table.
///
/// `username`, `phone` and `email` must stay unique across all rows; every
/// implementation reports a collision as [`StoreError::Conflict`].
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError>;

    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    /// Rewrite every mutable column of `user`. Returns `None` if the row no
    /// longer exists.
    async fn update(&self, user: &User) -> Result<Option<User>, StoreError>;

    /// Returns `false` if there was no row to delete.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}
