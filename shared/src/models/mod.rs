//! Data models
//!
//! Shared between the catalog client, the draft editor and the admin
//! frontend (via API).

pub mod image;
pub mod product;

// Re-exports
pub use image::*;
pub use product::*;
