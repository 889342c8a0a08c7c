use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Error types for the account model
#[derive(Error, Debug)]
pub enum AccountError {
    /// A user was requested without a username
    #[error("The given username must be set")]
    EmptyUsername,

    /// Field validation rejected the input before it reached the database
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Error from the database operations, including uniqueness violations
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// The password hashing backend failed
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// No user exists with the given username
    #[error("User not found: {0}")]
    UserNotFound(String),
}

impl AccountError {
    /// True when the underlying database rejected a write because of a unique constraint,
    /// e.g. a duplicate username or a duplicate `(user, key)` property.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AccountError::Database(err) => {
                matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
            }
            _ => false,
        }
    }
}

/// Type alias for Result with AccountError
pub type Result<T> = std::result::Result<T, AccountError>;
