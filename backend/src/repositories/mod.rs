//! Persistence layer for users and tokens.
//!
//! The authenticator only talks to the [`CredentialStore`] and [`TokenStore`]
//! traits. Two backends implement them: SQLite (`user_repository`,
//! `token_repository`) and process memory (`memory_repository`).
//!
//! Every mutating call must be atomic with respect to its uniqueness rule:
//! one user per email, one token per user.

use crate::database::models::{Token, User};
use crate::errors::ServiceResult;
use async_trait::async_trait;

pub mod memory_repository;
pub mod token_repository;
pub mod user_repository;

/// Stores user identities and checks passwords against them.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Creates a user with a salted hash of `raw_password`.
    ///
    /// # Errors
    /// `ServiceError::DuplicateEmail` if the (normalized) email is taken.
    async fn create(&self, email: &str, raw_password: &str) -> ServiceResult<User>;

    /// Returns the user when the email exists and the password matches.
    ///
    /// Unknown email and wrong password both yield `Ok(None)`.
    async fn verify(&self, email: &str, raw_password: &str) -> ServiceResult<Option<User>>;

    /// Looks a user up by id.
    async fn find_by_id(&self, user_id: &str) -> ServiceResult<Option<User>>;
}

/// Stores opaque bearer tokens, at most one per user.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the user's current token, creating one if there is none.
    async fn issue_or_get(&self, user: &User) -> ServiceResult<Token>;

    /// Creates a fresh token without looking for an existing one.
    ///
    /// # Errors
    /// `ServiceError::AlreadyExists` if the user already holds a token.
    async fn issue_new(&self, user: &User) -> ServiceResult<Token>;

    /// Deletes a token. Returns whether it existed.
    async fn revoke(&self, token_key: &str) -> ServiceResult<bool>;

    /// Looks a token up by its key.
    async fn find(&self, token_key: &str) -> ServiceResult<Option<Token>>;
}
