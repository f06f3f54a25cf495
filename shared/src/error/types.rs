//! Error value and the REST response envelope

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error surfaced to the admin frontend
///
/// `details` carries the structured context the UI highlights: the offending
/// field, a variant/size position, a file name.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error carrying the code's stock message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach one detail entry, replacing any previous value under `key`
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }
}

/// Envelope the catalog REST API wraps every body in
///
/// `code` is 0 (or absent) on success. Failed envelopes carry `message` and,
/// for validation failures, `details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self.code, None | Some(0))
    }

    /// Rebuild the server's error from a failed envelope
    ///
    /// Codes this build does not know become [`ErrorCode::Unknown`]; the
    /// server's message is kept either way.
    pub fn to_error(&self) -> AppError {
        let code = self
            .code
            .and_then(|c| ErrorCode::try_from(c).ok())
            .unwrap_or(ErrorCode::Unknown);
        AppError {
            code,
            message: self.message.clone(),
            details: self.details.clone(),
        }
    }

    /// Split the envelope into its payload or its error
    pub fn into_result(self) -> Result<Option<T>, AppError> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(self.to_error())
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
