//! Bounded product gallery
//!
//! The gallery holds at most [`MAX_IMAGES`] entries. New files are decoded
//! concurrently, but the merged list always follows selection order and is
//! produced once, after every decode in the batch has settled.

use super::decoder::{DecodeError, FileDecoder, SelectedFile};
use crate::error::EditBlocked;
use futures::future::join_all;
use serde::Serialize;
use shared::{ImageRef, InlineImage};
use thiserror::Error;

/// Maximum number of images per product
pub const MAX_IMAGES: usize = 5;

/// Gallery is full, nothing was added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("A product holds at most {max} images")]
pub struct CapacityError {
    pub max: usize,
}

/// Files decoded for one selection, in selection order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedBatch {
    pub images: Vec<InlineImage>,
    /// Files dropped for lack of room
    pub rejected: usize,
    /// Files that failed to decode; the rest of the batch still applies
    pub failures: Vec<DecodeError>,
}

/// Result of adding a selection to the gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddImagesOutcome {
    /// The merged gallery
    pub images: Vec<ImageRef>,
    pub accepted: usize,
    pub rejected: usize,
    pub failures: Vec<DecodeError>,
}

impl AddImagesOutcome {
    /// More files were selected than there was room for
    pub fn is_partial(&self) -> bool {
        self.rejected > 0
    }
}

/// Which image the gallery viewer shows after a removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum GallerySelection {
    /// No image left, the viewer closes
    Closed,
    Open(usize),
}

/// Result of removing one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveImageOutcome {
    pub images: Vec<ImageRef>,
    pub selection: GallerySelection,
}

/// Decode the part of `files` that fits next to `current_len` images
///
/// Fails without decoding anything when the gallery is already full.
pub async fn decode_selection(
    current_len: usize,
    files: &[SelectedFile],
    decoder: &dyn FileDecoder,
) -> Result<DecodedBatch, CapacityError> {
    let remaining = MAX_IMAGES.saturating_sub(current_len);
    if remaining == 0 {
        tracing::warn!(current = current_len, "Image limit reached");
        return Err(CapacityError { max: MAX_IMAGES });
    }

    let take = remaining.min(files.len());
    let rejected = files.len() - take;
    if rejected > 0 {
        tracing::warn!(selected = files.len(), rejected, "Not enough room for every selected image");
    }

    // join_all yields results in input order whatever the completion order
    let results = join_all(files[..take].iter().map(|file| decoder.decode(file))).await;

    let mut batch = DecodedBatch {
        rejected,
        ..Default::default()
    };
    for result in results {
        match result {
            Ok(image) => batch.images.push(image),
            Err(e) => {
                tracing::warn!(file = %e.file_name(), error = %e, "Image decode failed");
                batch.failures.push(e);
            }
        }
    }
    Ok(batch)
}

/// Append a decoded batch to `current`
///
/// Room is checked again against `current`, which may have changed while the
/// batch was decoding; images that no longer fit count as rejected.
pub fn merge_batch(current: &[ImageRef], batch: DecodedBatch) -> Result<AddImagesOutcome, CapacityError> {
    let remaining = MAX_IMAGES.saturating_sub(current.len());
    if remaining == 0 && !batch.images.is_empty() {
        return Err(CapacityError { max: MAX_IMAGES });
    }

    let decoded = batch.images.len();
    let accepted = decoded.min(remaining);
    let mut images = current.to_vec();
    images.extend(batch.images.into_iter().take(accepted).map(ImageRef::Inline));

    Ok(AddImagesOutcome {
        images,
        accepted,
        rejected: batch.rejected + (decoded - accepted),
        failures: batch.failures,
    })
}

/// Decode `files` and append them to `current`
pub async fn add_images(
    current: &[ImageRef],
    files: &[SelectedFile],
    decoder: &dyn FileDecoder,
) -> Result<AddImagesOutcome, CapacityError> {
    let batch = decode_selection(current.len(), files, decoder).await?;
    merge_batch(current, batch)
}

/// Remove the image at `index` and move the viewer selection accordingly
pub fn remove_image(
    images: &[ImageRef],
    index: usize,
    selected: usize,
) -> Result<RemoveImageOutcome, EditBlocked> {
    if index >= images.len() {
        return Err(EditBlocked::ImageOutOfRange { index });
    }
    let mut next = images.to_vec();
    next.remove(index);

    let selection = match next.len() {
        0 => GallerySelection::Closed,
        len if selected > len - 1 => GallerySelection::Open(len - 1),
        _ if index < selected => GallerySelection::Open(selected - 1),
        _ => GallerySelection::Open(selected),
    };

    Ok(RemoveImageOutcome {
        images: next,
        selection,
    })
}

/// Entries of `original` missing from `current`, in original order
pub fn compute_removed_images(original: &[ImageRef], current: &[ImageRef]) -> Vec<ImageRef> {
    let mut removed: Vec<ImageRef> = Vec::new();
    for image in original {
        if !current.contains(image) && !removed.contains(image) {
            removed.push(image.clone());
        }
    }
    removed
}
