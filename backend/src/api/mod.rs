//! Top-level HTTP surface.
//!
//! Assembles the application router: service info and health endpoints, the
//! authentication routes under `/api/users`, and the shared layers (request
//! tracing, CORS, the `Authenticator` extension).

pub mod common;
pub mod health;

use crate::auth::service::Authenticator;
use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

/// Builds the complete application router.
pub fn app_router(authenticator: Arc<Authenticator>, cors_allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .nest("/api/users", crate::auth::routes::auth_router())
        .layer(cors_layer(cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(authenticator))
}

/// Permissive CORS when no origins are configured, otherwise an allow-list
/// that also permits credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::password::PasswordHasher;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(origins: &[String]) -> Router {
        let authenticator = Authenticator::in_memory(PasswordHasher::new(4).unwrap());
        app_router(Arc::new(authenticator), origins)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app(&[])
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn allowed_origin_gets_credentialed_cors() {
        let origin = "http://127.0.0.1:5173";
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/users/login/")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app(&[origin.to_string()]).oneshot(request).await.unwrap();
        let headers = response.headers();

        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            origin
        );
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = app(&[])
            .oneshot(Request::get("/api/users/nope/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
