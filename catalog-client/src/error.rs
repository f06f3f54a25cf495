//! Failures of a catalog API call

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Everything a catalog API call can fail with
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: refused, reset, timed out
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 2xx body that is not the expected envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// 401, token missing or rejected
    #[error("Authentication required")]
    Unauthorized,

    /// 403
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// 404 without an error envelope
    #[error("Not found: {0}")]
    NotFound(String),

    /// 400/422 without an error envelope
    #[error("Validation error: {0}")]
    Validation(String),

    /// 5xx without an error envelope
    #[error("Internal error: {0}")]
    Internal(String),

    /// Server answered with an error envelope
    #[error("{0}")]
    Api(AppError),

    /// Pending image payload could not be decoded for upload
    #[error("Invalid inline image: {0}")]
    InvalidImage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Stable error code for this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::InvalidResponse(_) | Self::Serialization(_) => ErrorCode::InvalidFormat,
            Self::Unauthorized => ErrorCode::NotAuthenticated,
            Self::Forbidden(_) => ErrorCode::PermissionDenied,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::Internal(_) => ErrorCode::InternalError,
            Self::Api(err) => err.code,
            Self::InvalidImage(_) => ErrorCode::InvalidImageFile,
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api(app) => app,
            other => AppError::with_message(other.code(), other.to_string()),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
