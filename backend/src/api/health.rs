//! Service info and liveness endpoints.

use crate::api::common::ApiResponse;
use axum::response::Json;
use serde_json::{Value, json};

pub async fn root_handler() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(
        json!({
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }),
        "Welcome to the tokengate API",
    ))
}

pub async fn health_handler() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(json!({ "status": "ok" }), "Service is healthy"))
}
