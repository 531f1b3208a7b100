//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the stores. They differ from the API-specific models in `auth::models`.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered identity. Email is the only identity key.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// An opaque bearer token bound to exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Token {
    pub key: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl Token {
    pub fn new(key: String, user_id: String) -> Self {
        Self {
            key,
            user_id,
            created_at: Utc::now(),
        }
    }
}
