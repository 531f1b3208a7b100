//! SQLite repository for bearer tokens.
//!
//! Provides the SQLite-backed [`TokenStore`]. The `UNIQUE(user_id)` column
//! constraint is what keeps a user down to a single token.

use crate::database::models::{Token, User};
use crate::errors::{ServiceError, ServiceResult, is_unique_violation};
use crate::repositories::TokenStore;
use crate::utils::token_key::generate_token_key;
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Repository for token database operations.
pub struct TokenRepository {
    /// Shared SQLite connection pool
    pool: SqlitePool,
}

impl TokenRepository {
    /// Creates a new TokenRepository instance.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for TokenRepository {
    async fn issue_or_get(&self, user: &User) -> ServiceResult<Token> {
        let candidate = Token::new(generate_token_key(), user.id.clone());

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO tokens (key, user_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id) DO NOTHING
            "#,
        )
        .bind(&candidate.key)
        .bind(&candidate.user_id)
        .bind(candidate.created_at)
        .execute(&mut *tx)
        .await?;

        let token = sqlx::query_as::<_, Token>(
            "SELECT key, user_id, created_at FROM tokens WHERE user_id = ?",
        )
        .bind(&user.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(token)
    }

    async fn issue_new(&self, user: &User) -> ServiceResult<Token> {
        let token = Token::new(generate_token_key(), user.id.clone());

        sqlx::query("INSERT INTO tokens (key, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&token.key)
            .bind(&token.user_id)
            .bind(token.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ServiceError::already_exists("Token", &user.id)
                } else {
                    e.into()
                }
            })?;

        Ok(token)
    }

    async fn revoke(&self, token_key: &str) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM tokens WHERE key = ?")
            .bind(token_key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, token_key: &str) -> ServiceResult<Option<Token>> {
        let token = sqlx::query_as::<_, Token>(
            "SELECT key, user_id, created_at FROM tokens WHERE key = ?",
        )
        .bind(token_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }
}
