//! Numeric error codes
//!
//! Codes are grouped by range so a glance at the number tells where it came
//! from:
//! - 0xxx: general
//! - 1xxx: authentication
//! - 2xxx: permission
//! - 6xxx: catalog (products, images, variants, sizes, uploads, edit sessions)
//! - 9xxx: transport and server

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code shared by the REST API, the client and the editor
///
/// Travels as a bare `u16` so the admin frontend can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    Success = 0,
    /// Server sent a code this build does not know
    Unknown = 1,
    ValidationFailed = 2,
    NotFound = 3,
    AlreadyExists = 4,
    /// Body could not be (de)serialized
    InvalidFormat = 6,

    /// Missing or rejected API token
    NotAuthenticated = 1001,

    PermissionDenied = 2001,

    // ---- product ----
    ProductNotFound = 6001,
    /// Price is zero, negative or not a number
    ProductInvalidPrice = 6002,
    /// Name, type, producer, description or material left blank
    ProductFieldRequired = 6003,

    // ---- gallery ----
    ProductImagesRequired = 6101,
    ProductImageLimit = 6102,
    ProductImageNotFound = 6103,

    // ---- variants ----
    VariantNotFound = 6201,
    /// Removing the only variant, or submitting none
    VariantRequired = 6202,
    VariantColorRequired = 6203,

    // ---- sizes ----
    SizeNotFound = 6301,
    /// Removing a variant's only size, or submitting a variant without sizes
    SizeRequired = 6302,
    SizeLabelRequired = 6303,
    SizeInvalidStock = 6304,

    // ---- picked files ----
    FileTooLarge = 6501,
    UnsupportedFileFormat = 6502,
    /// Bytes do not decode as any supported image
    InvalidImageFile = 6503,
    EmptyFile = 6505,
    FileReadFailed = 6509,

    // ---- edit session ----
    EditSessionNotActive = 6601,
    EditSessionActive = 6602,
    SaveInProgress = 6603,

    InternalError = 9001,
    /// Connection refused, reset or unreachable
    NetworkError = 9003,
    TimeoutError = 9004,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Stock English message, used when no context-specific one is given
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "OK",
            ErrorCode::Unknown => "Unrecognized error",
            ErrorCode::ValidationFailed => "Request was rejected as invalid",
            ErrorCode::NotFound => "Not found",
            ErrorCode::AlreadyExists => "Already exists",
            ErrorCode::InvalidFormat => "Malformed body",

            ErrorCode::NotAuthenticated => "API token missing or rejected",
            ErrorCode::PermissionDenied => "Not allowed to edit the catalog",

            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product price must be greater than zero",
            ErrorCode::ProductFieldRequired => "Product field is required",
            ErrorCode::ProductImagesRequired => "Product needs at least one image",
            ErrorCode::ProductImageLimit => "Product image limit reached",
            ErrorCode::ProductImageNotFound => "Product image not found",
            ErrorCode::VariantNotFound => "Variant not found",
            ErrorCode::VariantRequired => "Product needs at least one variant",
            ErrorCode::VariantColorRequired => "Variant color is required",
            ErrorCode::SizeNotFound => "Size not found",
            ErrorCode::SizeRequired => "Variant needs at least one size",
            ErrorCode::SizeLabelRequired => "Size label is required",
            ErrorCode::SizeInvalidStock => "Stock must be a non-negative integer",

            ErrorCode::FileTooLarge => "File is too large",
            ErrorCode::UnsupportedFileFormat => "File type is not an accepted image format",
            ErrorCode::InvalidImageFile => "File is not a readable image",
            ErrorCode::EmptyFile => "File is empty",
            ErrorCode::FileReadFailed => "File could not be read",

            ErrorCode::EditSessionNotActive => "No product draft is open",
            ErrorCode::EditSessionActive => "A product draft is already open",
            ErrorCode::SaveInProgress => "A save is already in progress",

            ErrorCode::InternalError => "Catalog service failed",
            ErrorCode::NetworkError => "Catalog service unreachable",
            ErrorCode::TimeoutError => "Catalog service did not answer in time",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A `u16` that names no [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown error code {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            6 => Ok(ErrorCode::InvalidFormat),

            1001 => Ok(ErrorCode::NotAuthenticated),
            2001 => Ok(ErrorCode::PermissionDenied),

            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductFieldRequired),
            6101 => Ok(ErrorCode::ProductImagesRequired),
            6102 => Ok(ErrorCode::ProductImageLimit),
            6103 => Ok(ErrorCode::ProductImageNotFound),
            6201 => Ok(ErrorCode::VariantNotFound),
            6202 => Ok(ErrorCode::VariantRequired),
            6203 => Ok(ErrorCode::VariantColorRequired),
            6301 => Ok(ErrorCode::SizeNotFound),
            6302 => Ok(ErrorCode::SizeRequired),
            6303 => Ok(ErrorCode::SizeLabelRequired),
            6304 => Ok(ErrorCode::SizeInvalidStock),

            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6505 => Ok(ErrorCode::EmptyFile),
            6509 => Ok(ErrorCode::FileReadFailed),

            6601 => Ok(ErrorCode::EditSessionNotActive),
            6602 => Ok(ErrorCode::EditSessionActive),
            6603 => Ok(ErrorCode::SaveInProgress),

            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
