//! Core business logic for the authentication system.

use crate::auth::models::{AuthSession, AuthenticatedUser};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::memory_repository::{InMemoryTokenRepository, InMemoryUserRepository};
use crate::repositories::token_repository::TokenRepository;
use crate::repositories::user_repository::UserRepository;
use crate::repositories::{CredentialStore, TokenStore};
use crate::utils::password::PasswordHasher;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info};

/// Verifies credentials and issues or revokes tokens.
///
/// Holds no per-request state; one instance is shared by every handler.
#[derive(Clone)]
pub struct Authenticator {
    credentials: Arc<dyn CredentialStore>,
    tokens: Arc<dyn TokenStore>,
}

impl Authenticator {
    /// Create an Authenticator over arbitrary stores
    pub fn new(credentials: Arc<dyn CredentialStore>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            credentials,
            tokens,
        }
    }

    /// Authenticator backed by the SQLite repositories
    pub fn sqlite(pool: SqlitePool, hasher: PasswordHasher) -> Self {
        Self::new(
            Arc::new(UserRepository::new(pool.clone(), hasher)),
            Arc::new(TokenRepository::new(pool)),
        )
    }

    /// Authenticator backed by process memory
    pub fn in_memory(hasher: PasswordHasher) -> Self {
        Self::new(
            Arc::new(InMemoryUserRepository::new(hasher)),
            Arc::new(InMemoryTokenRepository::new()),
        )
    }

    /// Check credentials and hand back the user's token, creating it if needed.
    ///
    /// Repeated logins return the same token.
    ///
    /// # Errors
    /// `ServiceError::AuthFailed` for an unknown email or a wrong password alike.
    pub async fn login(&self, email: &str, raw_password: &str) -> ServiceResult<AuthSession> {
        let Some(user) = self.credentials.verify(email, raw_password).await? else {
            info!("Login failed");
            return Err(ServiceError::AuthFailed);
        };

        let token = self.tokens.issue_or_get(&user).await?;
        info!(user_id = %user.id, "User logged in");

        Ok(AuthSession { user, token })
    }

    /// Create a user and issue their first token.
    ///
    /// # Errors
    /// `ServiceError::DuplicateEmail` when the email is already registered.
    pub async fn register(&self, email: &str, raw_password: &str) -> ServiceResult<AuthSession> {
        let user = self.credentials.create(email, raw_password).await?;
        let token = self.tokens.issue_new(&user).await?;
        info!(user_id = %user.id, "User registered");

        Ok(AuthSession { user, token })
    }

    /// Revoke a token.
    ///
    /// # Errors
    /// `ServiceError::TokenNotFound` if the token is unknown or already revoked.
    pub async fn logout(&self, token_key: &str) -> ServiceResult<()> {
        if !self.tokens.revoke(token_key).await? {
            return Err(ServiceError::TokenNotFound);
        }
        debug!("Token revoked");
        Ok(())
    }

    /// Resolve a bearer token to the identity it was issued for.
    pub async fn authenticate_token(
        &self,
        token_key: &str,
    ) -> ServiceResult<Option<AuthenticatedUser>> {
        let Some(token) = self.tokens.find(token_key).await? else {
            return Ok(None);
        };

        let user = self.credentials.find_by_id(&token.user_id).await?;

        Ok(user.map(|user| AuthenticatedUser {
            user_id: user.id,
            email: user.email,
            token: token.key,
        }))
    }
}
