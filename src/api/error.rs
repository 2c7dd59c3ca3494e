use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::query::QueryError;

/// Errors surfaced to HTTP clients as `{"error": "<message>"}`.
///
/// Processing failures carry a generic message; the underlying
/// [`QueryError`] is only logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    MissingParameter(&'static str),

    #[error("Request body must be a JSON object with string column names")]
    InvalidBody(String),

    #[error("{message}")]
    Processing {
        message: &'static str,
        #[source]
        source: QueryError,
    },
}

impl ApiError {
    pub fn processing(message: &'static str) -> impl FnOnce(QueryError) -> Self {
        move |source| ApiError::Processing { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Processing { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Processing { message, source } => log::error!("{message}: {source}"),
            ApiError::InvalidBody(detail) => log::warn!("Rejected request body: {detail}"),
            ApiError::MissingParameter(_) => {}
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
