//! Shared extractors for request handlers.

use crate::api::common::{error_response, validation_error_response};
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body extractor that also runs `validator` rules.
///
/// Malformed bodies, unknown fields and rule violations are all rejected
/// with a 400 and the standard error envelope. A missing JSON content type
/// keeps axum's 415.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection_to_http)?;

        value.validate().map_err(validation_error_response)?;

        Ok(ValidatedJson(value))
    }
}

fn json_rejection_to_http(rejection: JsonRejection) -> (StatusCode, String) {
    let status = match rejection {
        JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        _ => StatusCode::BAD_REQUEST,
    };
    error_response(status, rejection.body_text(), "validation_error", None)
}
