//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use ensindex_status_core::StatusError;

use crate::source::SourceError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed query parameters.
    #[error("{message}: {details}")]
    RequestValidation { message: String, details: String },

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Status(#[from] StatusError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn invalid_query(details: impl Into<String>) -> Self {
        Self::RequestValidation {
            message: "Invalid Input".to_string(),
            details: details.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RequestValidation { .. } => StatusCode::BAD_REQUEST,
            Self::Source(_) | Self::Status(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::RequestValidation { message, details } => ErrorResponse {
                message,
                details: Some(details),
            },
            other => ErrorResponse {
                message: "Indexing Status is currently unavailable".to_string(),
                details: Some(other.to_string()),
            },
        };
        (status, Json(body)).into_response()
    }
}
