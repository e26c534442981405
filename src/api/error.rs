//! HTTP error responses.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use super::types::{endpoint_paths, ErrorResponse};

/// Errors surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No route matches the request path and method.
    #[error("not found: {method} {path}")]
    NotFound {
        /// Request method.
        method: String,
        /// Request path.
        path: String,
    },

    /// A handler panicked.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::NotFound { .. } => ErrorResponse {
                error: "Not Found",
                message: "Endpoint does not exist".to_string(),
                available_endpoints: Some(endpoint_paths()),
            },
            Self::Internal(_) => ErrorResponse {
                error: "Internal Server Error",
                message: "An unexpected error occurred".to_string(),
                available_endpoints: None,
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Turn a caught handler panic into a 500 response.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!(panic = %detail, "Request handler panicked");
    ApiError::Internal(detail).into_response()
}
