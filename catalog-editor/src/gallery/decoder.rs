//! Selected image files and their inline encoding

use async_trait::async_trait;
use image::ImageFormat;
use shared::error::ErrorCode;
use shared::InlineImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default maximum file size (5MB)
pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported file extensions
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// Where the bytes of a selected file come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Already in memory (drag-and-drop, paste, tests)
    Bytes(Vec<u8>),
    /// On disk, read on decode
    Path(PathBuf),
}

/// A file picked by the user for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub source: FileSource,
}

impl SelectedFile {
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Bytes(bytes.into()),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            name,
            source: FileSource::Path(path.to_path_buf()),
        }
    }

    /// Lower-cased extension of the file name
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }
}

/// A single file that could not be turned into an inline image
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("File {file} is empty")]
    Empty { file: String },

    #[error("File {file} is too large ({size} bytes, maximum {max} bytes)")]
    TooLarge { file: String, size: u64, max: usize },

    #[error("File {file} has an unsupported format, supported: {}", SUPPORTED_FORMATS.join(", "))]
    UnsupportedFormat { file: String },

    #[error("File {file} is not a valid image")]
    InvalidImage { file: String },

    #[error("Failed to read {file}: {message}")]
    Read { file: String, message: String },
}

impl DecodeError {
    /// Name of the file that failed
    pub fn file_name(&self) -> &str {
        match self {
            Self::Empty { file }
            | Self::TooLarge { file, .. }
            | Self::UnsupportedFormat { file }
            | Self::InvalidImage { file }
            | Self::Read { file, .. } => file,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Empty { .. } => ErrorCode::EmptyFile,
            Self::TooLarge { .. } => ErrorCode::FileTooLarge,
            Self::UnsupportedFormat { .. } => ErrorCode::UnsupportedFileFormat,
            Self::InvalidImage { .. } => ErrorCode::InvalidImageFile,
            Self::Read { .. } => ErrorCode::FileReadFailed,
        }
    }
}

/// Turns a selected file into an inline image
#[async_trait]
pub trait FileDecoder: Send + Sync {
    async fn decode(&self, file: &SelectedFile) -> Result<InlineImage, DecodeError>;
}

/// Reads the file, checks it and base64-encodes it
#[derive(Debug, Clone)]
pub struct Base64Decoder {
    max_file_size: usize,
}

impl Base64Decoder {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    async fn read(&self, file: &SelectedFile) -> Result<Vec<u8>, DecodeError> {
        let read_error = |e: std::io::Error| DecodeError::Read {
            file: file.name.clone(),
            message: e.to_string(),
        };
        match &file.source {
            FileSource::Bytes(bytes) => {
                self.check_size(file, bytes.len() as u64)?;
                Ok(bytes.clone())
            }
            FileSource::Path(path) => {
                let metadata = tokio::fs::metadata(path).await.map_err(read_error)?;
                self.check_size(file, metadata.len())?;
                tokio::fs::read(path).await.map_err(read_error)
            }
        }
    }

    fn check_size(&self, file: &SelectedFile, size: u64) -> Result<(), DecodeError> {
        if size == 0 {
            return Err(DecodeError::Empty {
                file: file.name.clone(),
            });
        }
        if size > self.max_file_size as u64 {
            return Err(DecodeError::TooLarge {
                file: file.name.clone(),
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }
}

impl Default for Base64Decoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}

fn is_supported(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP | ImageFormat::Gif
    )
}

#[async_trait]
impl FileDecoder for Base64Decoder {
    async fn decode(&self, file: &SelectedFile) -> Result<InlineImage, DecodeError> {
        let unsupported = || DecodeError::UnsupportedFormat {
            file: file.name.clone(),
        };

        let ext = file.extension().ok_or_else(unsupported)?;
        if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
            return Err(unsupported());
        }

        let bytes = self.read(file).await?;

        // Content decides the MIME type, the extension only gates selection
        let format = image::guess_format(&bytes).map_err(|_| DecodeError::InvalidImage {
            file: file.name.clone(),
        })?;
        if !is_supported(format) {
            return Err(unsupported());
        }

        tracing::debug!(file = %file.name, size = bytes.len(), format = ?format, "Image encoded");
        Ok(InlineImage::from_bytes(format.to_mime_type(), &bytes))
    }
}
