//! Global application error types.
//!
//! This module defines the error type shared by the stores, the authenticator
//! and the HTTP layer, along with helper constructors for the common cases.

use thiserror::Error;

/// Errors produced by the credential store, token store and authenticator.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Bad credentials on login. Deliberately says nothing about which field was wrong.
    #[error("Invalid credentials")]
    AuthFailed,

    #[error("A user with email '{email}' already exists")]
    DuplicateEmail { email: String },

    /// The token was already revoked or never existed.
    #[error("Token not found")]
    TokenNotFound,

    #[error("{entity} already exists: {identifier}")]
    AlreadyExists { entity: String, identifier: String },

    /// Input the stores refuse to handle, such as a password bcrypt would truncate.
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {source}")]
    Database {
        #[from]
        source: anyhow::Error,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    pub fn already_exists(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(error: sqlx::Error) -> Self {
        Self::Database {
            source: error.into(),
        }
    }
}

/// Returns true when a sqlx error is a UNIQUE constraint violation.
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db_error| db_error.is_unique_violation())
}
