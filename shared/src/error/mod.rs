//! Unified error system for the catalog workspace
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response envelope
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::VariantRequired)
//!     .with_detail("field", "variants");
//! assert_eq!(err.code.code(), 6202);
//!
//! let body = r#"{"code":6202,"message":"At least one variant is required"}"#;
//! let response: ApiResponse<()> = serde_json::from_str(body).unwrap();
//! assert_eq!(response.to_error().code, ErrorCode::VariantRequired);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
