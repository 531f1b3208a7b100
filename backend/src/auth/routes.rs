//! Defines the HTTP routes for authentication.
//!
//! Login, registration, logout and current-user lookup. Designed to be nested
//! under `/api/users` in the main Axum router, which must also provide the
//! shared `Arc<Authenticator>` as an `Extension`.

use crate::auth::handlers::*;
use crate::auth::middleware::token_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/register/", post(register))
        .route("/login/", post(login))
        .route("/logout/", post(logout).layer(middleware::from_fn(token_auth)))
        .route("/me/", get(me).layer(middleware::from_fn(token_auth)))
}
