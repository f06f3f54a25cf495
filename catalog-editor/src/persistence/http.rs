//! REST-backed repository

use super::{PersistenceResult, ProductRepository};
use async_trait::async_trait;
use catalog_client::HttpClient;
use shared::{Product, ProductPayload};

#[async_trait]
impl ProductRepository for HttpClient {
    async fn fetch(&self, id: &str) -> PersistenceResult<Product> {
        Ok(self.fetch_product(id).await?)
    }

    async fn create(&self, product: &ProductPayload) -> PersistenceResult<Product> {
        Ok(self.create_product(product).await?)
    }

    async fn update(
        &self,
        id: &str,
        product: &ProductPayload,
        removed_images: &[String],
    ) -> PersistenceResult<Product> {
        Ok(self.update_product(id, product, removed_images).await?)
    }

    async fn delete(&self, id: &str) -> PersistenceResult<()> {
        Ok(self.delete_product(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_client::ClientConfig;
    use shared::error::ErrorCode;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let client = HttpClient::new(&ClientConfig::new("http://127.0.0.1:9").with_timeout(2)).unwrap();
        let repo: Arc<dyn ProductRepository> = Arc::new(client);

        let err = repo.fetch("p1").await.unwrap_err();
        assert!(matches!(
            err.code,
            ErrorCode::NetworkError | ErrorCode::TimeoutError
        ));
    }
}
