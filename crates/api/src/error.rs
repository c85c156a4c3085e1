//! API error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use spendflow_core::currency::CurrencyError;
use spendflow_core::workflow::WorkflowError;
use spendflow_shared::AppError;
use thiserror::Error;

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Workflow operation rejected.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Currency or rate table rejected.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// Transport-level failure (authentication, access, lookup).
    #[error(transparent)]
    App(#[from] AppError),
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Snake-case error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        let code = match self {
            Self::Workflow(e) => e.status_code(),
            Self::Currency(e) => e.status_code(),
            Self::App(e) => e.status_code(),
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Snake-case error code for the response body.
    #[must_use]
    pub fn code(&self) -> String {
        let code = match self {
            Self::Workflow(e) => e.error_code(),
            Self::Currency(e) => e.error_code(),
            Self::App(e) => e.error_code(),
        };
        code.to_ascii_lowercase()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let body = ErrorResponse {
            error: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
