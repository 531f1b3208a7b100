//! Middleware for protecting authenticated routes.
//!
//! Resolves the bearer token in the `Authorization` header to an
//! [`AuthenticatedUser`] before the handler runs.

use crate::auth::service::Authenticator;
use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::error;

/// Token authentication middleware
pub async fn token_auth(mut request: Request, next: Next) -> Result<Response, StatusCode> {
    let token = extract_token(request.headers()).ok_or(StatusCode::UNAUTHORIZED)?;

    let authenticator = request
        .extensions()
        .get::<Arc<Authenticator>>()
        .cloned()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    match authenticator.authenticate_token(&token).await {
        Ok(Some(user)) => {
            // Add the identity to request extensions for use in handlers
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        Ok(None) => Err(StatusCode::UNAUTHORIZED),
        Err(e) => {
            error!("Token lookup failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Pulls the token out of `Authorization: Bearer <key>` or `Authorization: Token <key>`.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = auth_header.trim().split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") && !scheme.eq_ignore_ascii_case("token") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() || token.contains(' ') {
        return None;
    }

    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn accepts_bearer_and_token_schemes() {
        assert_eq!(extract_token(&headers("Bearer abc")).as_deref(), Some("abc"));
        assert_eq!(extract_token(&headers("Token abc")).as_deref(), Some("abc"));
        assert_eq!(extract_token(&headers("bearer abc")).as_deref(), Some("abc"));
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(extract_token(&HeaderMap::new()).is_none());
        assert!(extract_token(&headers("abc")).is_none());
        assert!(extract_token(&headers("Basic abc")).is_none());
        assert!(extract_token(&headers("Bearer ")).is_none());
        assert!(extract_token(&headers("Bearer a b")).is_none());
    }
}
