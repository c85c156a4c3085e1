//! Errors raised outside the workflow: caller identification, access checks
//! and configuration loading.

use thiserror::Error;

/// Application error types.
///
/// Workflow and currency failures carry their own error enums.
#[derive(Debug, Error)]
pub enum AppError {
    /// No registered actor could be identified for the request.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// The caller's role does not allow the operation.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Configuration sources could not be read or deserialized.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::Config(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }
}
