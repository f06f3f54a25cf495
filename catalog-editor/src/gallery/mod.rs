//! Product image gallery: file decoding and lifecycle tracking

mod decoder;
mod tracker;

pub use decoder::{
    Base64Decoder, DEFAULT_MAX_FILE_SIZE, DecodeError, FileDecoder, FileSource, SUPPORTED_FORMATS,
    SelectedFile,
};
pub use tracker::{
    AddImagesOutcome, CapacityError, DecodedBatch, GallerySelection, MAX_IMAGES, RemoveImageOutcome,
    add_images, compute_removed_images, decode_selection, merge_batch, remove_image,
};
