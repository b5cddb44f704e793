use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Error types for the model layer
#[derive(Error, Debug)]
pub enum ModelError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Error while producing a password hash
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

/// Which unique column a rejected insert or update collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    Username,
    Email,
}

impl ModelError {
    /// The unique constraint this error violated, if it is a uniqueness violation
    /// on the users table.
    pub fn conflict(&self) -> Option<Conflict> {
        let ModelError::Database(db_err) = self else {
            return None;
        };
        match db_err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => {
                if message.contains("email") {
                    Some(Conflict::Email)
                } else {
                    Some(Conflict::Username)
                }
            }
            _ => None,
        }
    }

    /// True when the backend rejected the write for a constraint: uniqueness,
    /// foreign key or not-null.
    pub fn is_constraint_violation(&self) -> bool {
        let ModelError::Database(db_err) = self else {
            return false;
        };
        if db_err.sql_err().is_some() {
            return true;
        }
        // sqlx does not classify NOT NULL failures, fall back to the message
        let message = db_err.to_string().to_lowercase();
        message.contains("not null") || message.contains("constraint")
    }
}

/// Type alias for Result with ModelError
pub type Result<T> = std::result::Result<T, ModelError>;
