//! Shared types for the catalog workspace
//!
//! Product models, persistence payloads, temporary-id conventions and the
//! unified error/response types used by both the REST client and the draft
//! editor.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{
    ImageRef, InlineImage, Product, ProductPayload, Size, SizePayload, Variant, VariantPayload,
};
