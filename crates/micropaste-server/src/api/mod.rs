// ABOUTME: API module containing the HTTP handler functions for the micropaste REST API.
// ABOUTME: Also provides the pretty-printed JSON responder and error-to-status mapping.

pub mod entries;
pub mod stream;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use micropaste_store::StoreError;
use serde::Serialize;

/// JSON responder that pretty-prints its payload, matching the service's
/// external contract of human-readable responses.
pub struct PrettyJson<T>(pub T);

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_string_pretty(&self.0) {
            Ok(body) => (
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("failed to serialize response body: {e}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Uniform error payload with the given status code.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, PrettyJson(serde_json::json!({ "error": message }))).into_response()
}

/// Map a store failure onto the HTTP contract. Domain failures keep their
/// message and collapse to 400; storage faults are logged and become an
/// opaque 500.
pub fn store_error_response(err: StoreError) -> Response {
    match err {
        StoreError::Sqlite(e) => {
            tracing::error!("storage failure: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal storage error")
        }
        other => {
            tracing::debug!("request rejected: {other}");
            error_response(StatusCode::BAD_REQUEST, &other.to_string())
        }
    }
}
