//! SQLite repository for user identities.
//!
//! Provides the SQLite-backed [`CredentialStore`].

use crate::database::models::User;
use crate::errors::{ServiceError, ServiceResult, is_unique_violation};
use crate::repositories::CredentialStore;
use crate::utils::email::normalize_email;
use crate::utils::password::PasswordHasher;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

/// Repository for user database operations.
pub struct UserRepository {
    /// Shared SQLite connection pool
    pool: SqlitePool,
    hasher: PasswordHasher,
}

impl UserRepository {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// * `pool` - SQLite connection pool
    /// * `hasher` - Password hasher used on create and verify
    pub fn new(pool: SqlitePool, hasher: PasswordHasher) -> Self {
        Self { pool, hasher }
    }

    /// Retrieves a user by their (already normalized) email.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    pub async fn get_user_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Checks if an email already exists in the system.
    pub async fn email_exists(&self, email: &str) -> ServiceResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn create(&self, email: &str, raw_password: &str) -> ServiceResult<User> {
        let email = normalize_email(email);

        // Fast path; the UNIQUE constraint below settles races.
        if self.email_exists(&email).await? {
            return Err(ServiceError::duplicate_email(email));
        }

        let password_hash = self.hasher.hash_password(raw_password)?;
        let user = User::new(email, password_hash);

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ServiceError::duplicate_email(&user.email)
            } else {
                e.into()
            }
        })?;

        debug!(user_id = %user.id, "User row inserted");
        Ok(user)
    }

    async fn verify(&self, email: &str, raw_password: &str) -> ServiceResult<Option<User>> {
        let email = normalize_email(email);

        match self.get_user_by_email(&email).await? {
            Some(user) => {
                if self.hasher.verify_password(raw_password, &user.password_hash)? {
                    Ok(Some(user))
                } else {
                    Ok(None)
                }
            }
            None => {
                self.hasher.verify_dummy(raw_password);
                Ok(None)
            }
        }
    }

    async fn find_by_id(&self, user_id: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
