//! HTTP API handlers for anneval-web

pub mod audio;
pub mod evaluations;
pub mod evaluators;
pub mod health;
pub mod rubrics;
pub mod sessions;
pub mod sse;
pub mod stats;
pub mod ui;

use anneval_common::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// API error response: a JSON body with the raw error message, mapped to a
/// status code by error class.
///
/// Validation failures are 400, missing rows are 404, everything else 500;
/// the client surfaces the message and preserves its form state so the
/// user can retry manually. No automatic retries exist anywhere.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Database(_) | Error::Io(_) | Error::Config(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}
