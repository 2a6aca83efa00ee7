//! Response mapping.
//!
//! # Responsibilities
//! - Relay upstream success responses verbatim (status, content type, body)
//! - Map `RelayError` to the JSON error shapes clients see
//! - Keep internal failure detail in the logs, out of responses

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::relay::{RelayError, UpstreamResponse};

/// JSON `{"error": message}` with the given status.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        match self.content_type {
            Some(content_type) => {
                response.headers_mut().insert(header::CONTENT_TYPE, content_type);
            }
            None => {
                response.headers_mut().remove(header::CONTENT_TYPE);
            }
        }
        response
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            RelayError::InvalidRequest(message) => error_response(StatusCode::BAD_REQUEST, message),
            RelayError::Exhausted { attempts } => (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "All base URLs failed",
                    "attempts": attempts,
                })),
            )
                .into_response(),
            other => {
                tracing::error!(error = %other, "Relay request failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}
