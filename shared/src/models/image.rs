//! Product image references
//!
//! A product image is either a persisted remote reference (opaque URL handed
//! out by the server) or a pending upload carried inline as a base64 data URL.
//! On the wire both are plain strings; the `data:` prefix tells them apart.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Prefix marking an inline-encoded pending image
pub const INLINE_IMAGE_PREFIX: &str = "data:";

const BASE64_MARKER: &str = ";base64,";

/// Raised when a `data:` string is not a base64 data URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed inline image reference")]
pub struct InvalidImageRef;

/// Pending image encoded inline (not yet uploaded)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InlineImage {
    /// MIME type, e.g. `image/png`
    pub mime: String,
    /// Base64 payload (standard alphabet, padded)
    pub data: String,
}

impl InlineImage {
    /// Encode raw file bytes
    pub fn from_bytes(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime: mime.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Decode the payload back into raw bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.data.as_bytes())
    }

    /// Suggested file extension for multipart uploads
    pub fn extension(&self) -> &str {
        match self.mime.as_str() {
            "image/jpeg" => "jpg",
            other => other.rsplit('/').next().unwrap_or("bin"),
        }
    }

    fn parse(s: &str) -> Result<Self, InvalidImageRef> {
        let rest = s.strip_prefix(INLINE_IMAGE_PREFIX).ok_or(InvalidImageRef)?;
        let (mime, data) = rest.split_once(BASE64_MARKER).ok_or(InvalidImageRef)?;
        if mime.is_empty() {
            return Err(InvalidImageRef);
        }
        Ok(Self {
            mime: mime.to_string(),
            data: data.to_string(),
        })
    }
}

impl fmt::Display for InlineImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}", INLINE_IMAGE_PREFIX, self.mime, BASE64_MARKER, self.data)
    }
}

/// Image reference held by a product
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageRef {
    /// Persisted image, passed through by reference
    Remote(String),
    /// Newly selected image awaiting upload
    Inline(InlineImage),
}

impl ImageRef {
    /// Build a remote reference
    pub fn remote(url: impl Into<String>) -> Self {
        Self::Remote(url.into())
    }

    /// True for images that must be uploaded on save
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Inline(_))
    }

    /// True for images the server already stores
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Remote URL, if this image is persisted
    pub fn as_remote(&self) -> Option<&str> {
        match self {
            Self::Remote(url) => Some(url),
            Self::Inline(_) => None,
        }
    }

    /// Inline payload, if this image is pending
    pub fn as_inline(&self) -> Option<&InlineImage> {
        match self {
            Self::Remote(_) => None,
            Self::Inline(img) => Some(img),
        }
    }
}

impl TryFrom<String> for ImageRef {
    type Error = InvalidImageRef;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.starts_with(INLINE_IMAGE_PREFIX) {
            InlineImage::parse(&value).map(Self::Inline)
        } else {
            Ok(Self::Remote(value))
        }
    }
}

impl From<ImageRef> for String {
    fn from(value: ImageRef) -> Self {
        match value {
            ImageRef::Remote(url) => url,
            ImageRef::Inline(img) => img.to_string(),
        }
    }
}

impl From<InlineImage> for ImageRef {
    fn from(value: InlineImage) -> Self {
        Self::Inline(value)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::Inline(img) => fmt::Display::fmt(img, f),
        }
    }
}
