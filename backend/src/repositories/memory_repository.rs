//! In-memory implementations of the credential and token stores.
//!
//! Each store keeps its maps behind one `tokio::sync::Mutex`, so every
//! check-and-insert happens under a single lock acquisition.

use crate::database::models::{Token, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::{CredentialStore, TokenStore};
use crate::utils::email::normalize_email;
use crate::utils::password::PasswordHasher;
use crate::utils::token_key::generate_token_key;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Default)]
struct Users {
    by_id: HashMap<String, User>,
    id_by_email: HashMap<String, String>,
}

/// Process-local [`CredentialStore`]. Contents are lost on restart.
pub struct InMemoryUserRepository {
    users: Mutex<Users>,
    hasher: PasswordHasher,
}

impl InMemoryUserRepository {
    pub fn new(hasher: PasswordHasher) -> Self {
        Self {
            users: Mutex::new(Users::default()),
            hasher,
        }
    }

    async fn get_user_by_email(&self, email: &str) -> Option<User> {
        let users = self.users.lock().await;
        users
            .id_by_email
            .get(email)
            .and_then(|id| users.by_id.get(id))
            .cloned()
    }
}

#[async_trait]
impl CredentialStore for InMemoryUserRepository {
    async fn create(&self, email: &str, raw_password: &str) -> ServiceResult<User> {
        let email = normalize_email(email);

        if self.users.lock().await.id_by_email.contains_key(&email) {
            return Err(ServiceError::duplicate_email(email));
        }

        // Hash outside the lock, then re-check before inserting.
        let password_hash = self.hasher.hash_password(raw_password)?;
        let user = User::new(email, password_hash);

        let mut users = self.users.lock().await;
        if users.id_by_email.contains_key(&user.email) {
            return Err(ServiceError::duplicate_email(&user.email));
        }
        users
            .id_by_email
            .insert(user.email.clone(), user.id.clone());
        users.by_id.insert(user.id.clone(), user.clone());

        Ok(user)
    }

    async fn verify(&self, email: &str, raw_password: &str) -> ServiceResult<Option<User>> {
        let email = normalize_email(email);

        match self.get_user_by_email(&email).await {
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
        Ok(self.users.lock().await.by_id.get(user_id).cloned())
    }
}

#[derive(Default)]
struct Tokens {
    by_key: HashMap<String, Token>,
    key_by_user: HashMap<String, String>,
}

impl Tokens {
    fn insert(&mut self, token: Token) {
        self.key_by_user
            .insert(token.user_id.clone(), token.key.clone());
        self.by_key.insert(token.key.clone(), token);
    }
}

/// Process-local [`TokenStore`]. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryTokenRepository {
    tokens: Mutex<Tokens>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenRepository {
    async fn issue_or_get(&self, user: &User) -> ServiceResult<Token> {
        let mut tokens = self.tokens.lock().await;

        if let Some(existing) = tokens
            .key_by_user
            .get(&user.id)
            .and_then(|key| tokens.by_key.get(key))
        {
            return Ok(existing.clone());
        }

        let token = Token::new(generate_token_key(), user.id.clone());
        tokens.insert(token.clone());
        Ok(token)
    }

    async fn issue_new(&self, user: &User) -> ServiceResult<Token> {
        let mut tokens = self.tokens.lock().await;

        if tokens.key_by_user.contains_key(&user.id) {
            return Err(ServiceError::already_exists("Token", &user.id));
        }

        let token = Token::new(generate_token_key(), user.id.clone());
        tokens.insert(token.clone());
        Ok(token)
    }

    async fn revoke(&self, token_key: &str) -> ServiceResult<bool> {
        let mut tokens = self.tokens.lock().await;

        match tokens.by_key.remove(token_key) {
            Some(token) => {
                tokens.key_by_user.remove(&token.user_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find(&self, token_key: &str) -> ServiceResult<Option<Token>> {
        Ok(self.tokens.lock().await.by_key.get(token_key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn users() -> InMemoryUserRepository {
        InMemoryUserRepository::new(PasswordHasher::new(4).unwrap())
    }

    #[tokio::test]
    async fn duplicate_email_after_normalization() {
        let repo = users();
        repo.create("a@x.com", "p1").await.unwrap();

        let err = repo.create(" a@X.com", "p2").await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateEmail { .. }));
    }

    #[tokio::test]
    async fn verify_and_find_by_id() {
        let repo = users();
        let user = repo.create("a@x.com", "p1").await.unwrap();

        assert_eq!(repo.verify("a@x.com", "p1").await.unwrap().unwrap().id, user.id);
        assert!(repo.verify("a@x.com", "p2").await.unwrap().is_none());
        assert!(repo.verify("b@x.com", "p1").await.unwrap().is_none());
        assert_eq!(repo.find_by_id(&user.id).await.unwrap().unwrap().email, "a@x.com");
    }

    #[tokio::test]
    async fn concurrent_registrations_create_one_user() {
        let repo = Arc::new(users());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.create("race@x.com", "p1").await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(ServiceError::DuplicateEmail { .. }) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(repo.users.lock().await.by_id.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_logins_share_one_token() {
        let tokens = Arc::new(InMemoryTokenRepository::new());
        let user = User::new("a@x.com".to_string(), "hash".to_string());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tokens = Arc::clone(&tokens);
                let user = user.clone();
                tokio::spawn(async move { tokens.issue_or_get(&user).await.unwrap() })
            })
            .collect();

        let mut keys = Vec::new();
        for handle in handles {
            keys.push(handle.await.unwrap().key);
        }
        keys.dedup();
        assert_eq!(keys.len(), 1);
    }

    #[tokio::test]
    async fn revoke_frees_the_user_for_a_new_token() {
        let tokens = InMemoryTokenRepository::new();
        let user = User::new("a@x.com".to_string(), "hash".to_string());

        let first = tokens.issue_new(&user).await.unwrap();
        assert!(tokens.issue_new(&user).await.is_err());

        assert!(tokens.revoke(&first.key).await.unwrap());
        assert!(!tokens.revoke(&first.key).await.unwrap());
        assert!(tokens.find(&first.key).await.unwrap().is_none());

        let second = tokens.issue_or_get(&user).await.unwrap();
        assert_ne!(first.key, second.key);
    }
}
