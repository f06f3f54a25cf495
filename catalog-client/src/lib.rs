//! Catalog Client - HTTP client for the catalog REST API
//!
//! Provides the network calls the admin dashboard makes for products:
//! fetch, multipart create/update (pending images as binary parts) and delete.

pub mod config;
pub mod error;
pub mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;

// Re-export shared types for convenience
pub use shared::{ApiResponse, Product, ProductPayload};
