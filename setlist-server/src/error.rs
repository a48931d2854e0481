//! HTTP error mapping
//!
//! Every handler returns `ApiResult`. Domain errors map onto status codes
//! here, and the body is always `{"error": "<message>"}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use setlist_common::Error;
use tracing::error;

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Error raised by the library, repository or store
    #[error(transparent)]
    Common(#[from] Error),

    /// Request body could not be read as JSON of the expected shape (400)
    #[error("Invalid payload: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Common(Error::DuplicateTitle(_)) => StatusCode::BAD_REQUEST,
            ApiError::Common(Error::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Common(Error::InvalidPayload(_)) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Common(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
