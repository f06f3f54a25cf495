//! Editor error types
//!
//! Every error here is recoverable: the caller edits and resubmits, or
//! discards the draft. Each maps onto a stable [`ErrorCode`] for the frontend.

use crate::gallery::{CapacityError, DecodeError};
use crate::persistence::PersistenceError;
use crate::validation::ValidationError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// An edit that was refused; the previous snapshot stays current
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditBlocked {
    #[error("A product needs at least one variant")]
    LastVariant,

    #[error("Variant {variant} needs at least one size")]
    LastSize { variant: usize },

    #[error("Variant index {index} out of range")]
    VariantOutOfRange { index: usize },

    #[error("Size index {size} of variant {variant} out of range")]
    SizeOutOfRange { variant: usize, size: usize },

    #[error("Image index {index} out of range")]
    ImageOutOfRange { index: usize },

    #[error("Stock must be a non-negative integer, got {input:?}")]
    InvalidStock { input: String },

    #[error("Size label must not be empty")]
    EmptySizeLabel,

    #[error("Price must be a decimal number, got {input:?}")]
    InvalidPrice { input: String },
}

impl EditBlocked {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::LastVariant => ErrorCode::VariantRequired,
            Self::LastSize { .. } => ErrorCode::SizeRequired,
            Self::VariantOutOfRange { .. } => ErrorCode::VariantNotFound,
            Self::SizeOutOfRange { .. } => ErrorCode::SizeNotFound,
            Self::ImageOutOfRange { .. } => ErrorCode::ProductImageNotFound,
            Self::InvalidStock { .. } => ErrorCode::SizeInvalidStock,
            Self::EmptySizeLabel => ErrorCode::SizeLabelRequired,
            Self::InvalidPrice { .. } => ErrorCode::ProductInvalidPrice,
        }
    }
}

/// Editor error type
#[derive(Debug, Error)]
pub enum EditorError {
    /// Draft failed a submission rule
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Edit refused, snapshot unchanged
    #[error(transparent)]
    Blocked(#[from] EditBlocked),

    /// Gallery already full
    #[error(transparent)]
    Capacity(#[from] CapacityError),

    /// A selected file could not be read or encoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Create/update/fetch/delete failed
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Operation needs an open draft
    #[error("No product draft is open")]
    NotEditing,

    /// A draft is already open (or being saved)
    #[error("A product draft is already open")]
    AlreadyEditing,

    /// Draft is locked while the save is in flight
    #[error("A save is already in progress")]
    SaveInProgress,

    /// Operation needs a product on screen
    #[error("No product is selected")]
    NothingSelected,
}

impl EditorError {
    /// Stable error code for this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(e) => e.code(),
            Self::Blocked(e) => e.code(),
            Self::Capacity(_) => ErrorCode::ProductImageLimit,
            Self::Decode(e) => e.code(),
            Self::Persistence(e) => e.code,
            Self::NotEditing => ErrorCode::EditSessionNotActive,
            Self::AlreadyEditing => ErrorCode::EditSessionActive,
            Self::SaveInProgress => ErrorCode::SaveInProgress,
            Self::NothingSelected => ErrorCode::ProductNotFound,
        }
    }
}

impl From<EditorError> for AppError {
    fn from(err: EditorError) -> Self {
        let code = err.code();
        let message = err.to_string();
        match err {
            EditorError::Validation(e) => e.into(),
            EditorError::Persistence(e) => e.into(),
            EditorError::Blocked(EditBlocked::LastSize { variant }) => {
                AppError::with_message(code, message).with_detail("variant", variant)
            }
            EditorError::Blocked(EditBlocked::SizeOutOfRange { variant, size }) => {
                AppError::with_message(code, message)
                    .with_detail("variant", variant)
                    .with_detail("size", size)
            }
            EditorError::Capacity(e) => {
                AppError::with_message(code, message).with_detail("max", e.max)
            }
            EditorError::Decode(e) => {
                AppError::with_message(code, message).with_detail("file", e.file_name().to_string())
            }
            _ => AppError::with_message(code, message),
        }
    }
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCategory;

    #[test]
    fn test_blocked_codes() {
        assert_eq!(EditBlocked::LastVariant.code(), ErrorCode::VariantRequired);
        assert_eq!(
            EditBlocked::LastSize { variant: 0 }.code(),
            ErrorCode::SizeRequired
        );
        assert_eq!(
            EditBlocked::InvalidStock { input: "-1".into() }.code(),
            ErrorCode::SizeInvalidStock
        );
    }

    #[test]
    fn test_session_errors_map_to_session_category() {
        for err in [
            EditorError::NotEditing,
            EditorError::AlreadyEditing,
            EditorError::SaveInProgress,
        ] {
            assert_eq!(err.code().category(), ErrorCategory::Session);
        }
    }

    #[test]
    fn test_into_app_error_details() {
        let app: AppError = EditorError::Blocked(EditBlocked::SizeOutOfRange {
            variant: 1,
            size: 4,
        })
        .into();
        assert_eq!(app.code, ErrorCode::SizeNotFound);
        let details = app.details.unwrap();
        assert_eq!(details["variant"], 1);
        assert_eq!(details["size"], 4);

        let app: AppError = EditorError::Capacity(CapacityError { max: 5 }).into();
        assert_eq!(app.code, ErrorCode::ProductImageLimit);
        assert_eq!(app.details.unwrap()["max"], 5);
    }
}
