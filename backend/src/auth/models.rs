//! Data structures for the authentication endpoints.
//!
//! Request payloads list exactly the accepted fields; anything else in the
//! body is rejected rather than passed through.

use crate::database::models::{Token, User};
use crate::utils::password::MAX_PASSWORD_BYTES;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,
}

/// Registration request payload
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(
        length(
            min = 1,
            max = 128,
            message = "Password must be between 1-128 characters"
        ),
        custom(function = "validate_password_bytes")
    )]
    pub password: String,
}

/// bcrypt only reads a bounded number of bytes, and `length` counts characters.
fn validate_password_bytes(password: &str) -> Result<(), validator::ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(validator::ValidationError::new("password_too_long")
            .with_message(format!("Password must be at most {} bytes", MAX_PASSWORD_BYTES).into()));
    }
    Ok(())
}

/// Public view of a user
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub email: String,
}

/// Body returned by login and registration
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserInfo,
    pub token: String,
}

/// A user together with their active token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: Token,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        AuthResponse {
            user: UserInfo {
                email: session.user.email,
            },
            token: session.token.key,
        }
    }
}

/// Identity resolved from a bearer token.
///
/// Inserted into request extensions by `token_auth`; handlers take it as an
/// explicit argument instead of reading ambient session state.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub token: String,
}
