//! Catalog Editor - product draft editing for the admin dashboard
//!
//! # Layout
//!
//! - [`id`]: temporary ids for variants and sizes created client-side
//! - [`variant`]: variant / size list editing
//! - [`gallery`]: bounded image gallery and file decoding
//! - [`validation`]: ordered submission rules
//! - [`draft`]: editable product snapshot and payload cleaning
//! - [`persistence`]: repository trait, REST and in-memory implementations
//! - [`cache`]: product cache with per-product invalidation events
//! - [`session`]: Viewing / Editing / Saving state machine tying it together
//!
//! # Example
//!
//! ```no_run
//! use catalog_editor::{Base64Decoder, EditSession, InMemoryRepository, ProductCache};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), catalog_editor::EditorError> {
//! let session = EditSession::new(
//!     Arc::new(InMemoryRepository::new()),
//!     Arc::new(Base64Decoder::default()),
//!     ProductCache::new(),
//! );
//! session.begin_create()?;
//! session.add_variant()?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod draft;
pub mod error;
pub mod gallery;
pub mod id;
pub mod logger;
pub mod persistence;
pub mod session;
pub mod validation;
pub mod variant;

pub use cache::{CacheEvent, ProductCache};
pub use config::EditorConfig;
pub use draft::{CleanedPayload, DraftSource, ProductDraft, ProductField};
pub use error::{EditBlocked, EditorError, EditorResult};
pub use gallery::{
    AddImagesOutcome, Base64Decoder, CapacityError, DecodeError, FileDecoder, GallerySelection,
    MAX_IMAGES, RemoveImageOutcome, SelectedFile,
};
pub use id::{TempIdAllocator, TempIdKind};
pub use persistence::{InMemoryRepository, PersistenceError, PersistenceResult, ProductRepository};
pub use session::{EditSession, SessionState, SubmitOutcome};
pub use validation::{ValidationError, validate};
pub use variant::SizeField;

// Re-export shared types for convenience
pub use shared::{ImageRef, InlineImage, Product, ProductPayload, Size, Variant};
