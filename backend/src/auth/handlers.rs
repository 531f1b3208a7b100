//! Handler functions for authentication-related API endpoints.
//!
//! These functions extract and validate request data, call the shared
//! `Authenticator` and map its results to HTTP responses.

use crate::api::common::service_error_to_http;
use crate::auth::models::*;
use crate::auth::service::Authenticator;
use crate::errors::ServiceError;
use crate::utils::handlers_common::ValidatedJson;
use axum::{extract::Extension, http::StatusCode, response::Json as ResponseJson};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(authenticator): Extension<Arc<Authenticator>>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<ResponseJson<AuthResponse>, (StatusCode, String)> {
    match authenticator
        .register(&payload.email, &payload.password)
        .await
    {
        Ok(session) => Ok(ResponseJson(session.into())),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
///
/// Bad credentials answer 401 with a `null` body, the same for an unknown
/// email as for a wrong password.
#[axum::debug_handler]
pub async fn login(
    Extension(authenticator): Extension<Arc<Authenticator>>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<(StatusCode, ResponseJson<Option<AuthResponse>>), (StatusCode, String)> {
    match authenticator.login(&payload.email, &payload.password).await {
        Ok(session) => Ok((StatusCode::OK, ResponseJson(Some(session.into())))),
        Err(ServiceError::AuthFailed) => Ok((StatusCode::UNAUTHORIZED, ResponseJson(None))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request by revoking the caller's token
#[axum::debug_handler]
pub async fn logout(
    Extension(authenticator): Extension<Arc<Authenticator>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ResponseJson<Value>, (StatusCode, String)> {
    match authenticator.logout(&user.token).await {
        Ok(()) => {
            info!(user_id = %user.user_id, "User logged out");
            Ok(ResponseJson(Value::Null))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Get current user information from token
#[axum::debug_handler]
pub async fn me(Extension(user): Extension<AuthenticatedUser>) -> ResponseJson<UserInfo> {
    ResponseJson(UserInfo { email: user.email })
}
