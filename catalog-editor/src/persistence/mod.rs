//! Product persistence
//!
//! The editor talks to storage only through [`ProductRepository`]. The REST
//! client implements it for production; [`InMemoryRepository`] backs tests and
//! demos.

mod http;
mod memory;

pub use memory::InMemoryRepository;

use async_trait::async_trait;
use catalog_client::ClientError;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::{Product, ProductPayload};
use std::collections::HashMap;
use thiserror::Error;

/// Network or server failure while loading or saving a product
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PersistenceError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl PersistenceError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(id: &str) -> Self {
        Self::new(ErrorCode::ProductNotFound, format!("Product {} not found", id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.code, ErrorCode::ProductNotFound | ErrorCode::NotFound)
    }
}

impl From<ClientError> for PersistenceError {
    fn from(err: ClientError) -> Self {
        let app = AppError::from(err);
        Self {
            code: app.code,
            message: app.message,
            details: app.details,
        }
    }
}

impl From<PersistenceError> for AppError {
    fn from(err: PersistenceError) -> Self {
        AppError {
            code: err.code,
            message: err.message,
            details: err.details,
        }
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Product storage consumed by the editing session
///
/// `create` assigns ids to the product and to every variant/size sent without
/// one. `update` deletes `removed_images`; persisted images neither removed nor
/// re-sent are kept. Pending inline images are stored and come back as remote
/// references.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn fetch(&self, id: &str) -> PersistenceResult<Product>;

    async fn create(&self, product: &ProductPayload) -> PersistenceResult<Product>;

    async fn update(
        &self,
        id: &str,
        product: &ProductPayload,
        removed_images: &[String],
    ) -> PersistenceResult<Product>;

    async fn delete(&self, id: &str) -> PersistenceResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_client_error() {
        let err: PersistenceError = ClientError::Unauthorized.into();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);

        let server = AppError::with_message(ErrorCode::VariantRequired, "need a variant")
            .with_detail("field", "variants");
        let err: PersistenceError = ClientError::Api(server).into();
        assert_eq!(err.code, ErrorCode::VariantRequired);
        assert_eq!(err.to_string(), "need a variant");
        assert!(err.details.is_some());
    }

    #[test]
    fn test_not_found() {
        let err = PersistenceError::not_found("p7");
        assert!(err.is_not_found());
        assert!(PersistenceError::from(ClientError::NotFound("x".into())).is_not_found());

        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::ProductNotFound);
        assert_eq!(app.message, "Product p7 not found");
    }
}
