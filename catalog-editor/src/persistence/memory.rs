//! In-memory repository
//!
//! Behaves like the catalog server for the parts the editor relies on: id
//! assignment, storing uploads as remote references and deleting removed
//! images. A failure can be injected for the next call.

use super::{PersistenceError, PersistenceResult, ProductRepository};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared::{ImageRef, Product, ProductPayload, Size, Variant};
use std::collections::HashMap;

/// Base URL of images stored by [`InMemoryRepository`]
pub const MEMORY_IMAGE_BASE: &str = "memory://images";

#[derive(Debug, Default)]
struct MemoryState {
    products: HashMap<String, Product>,
    next_id: u64,
    deleted_images: Vec<String>,
    fail_next: Option<PersistenceError>,
}

impl MemoryState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn take_failure(&mut self) -> PersistenceResult<()> {
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn store_image(&mut self, image: &ImageRef) -> String {
        match image {
            ImageRef::Remote(url) => url.clone(),
            ImageRef::Inline(inline) => {
                let n = self.next_id("img");
                format!("{}/{}.{}", MEMORY_IMAGE_BASE, n, inline.extension())
            }
        }
    }

    fn materialize(&mut self, id: String, payload: &ProductPayload) -> Product {
        let images = payload
            .images
            .iter()
            .map(|img| ImageRef::Remote(self.store_image(img)))
            .collect();
        let variants = payload
            .variants
            .iter()
            .map(|v| Variant {
                id: v.id.clone().unwrap_or_else(|| self.next_id("var")),
                color: v.color.clone(),
                sizes: v
                    .sizes
                    .iter()
                    .map(|s| Size {
                        id: s.id.clone().unwrap_or_else(|| self.next_id("size")),
                        label: s.label.clone(),
                        stock: s.stock,
                    })
                    .collect(),
            })
            .collect();

        Product {
            id,
            name: payload.name.clone(),
            product_type: payload.product_type.clone(),
            price: payload.price,
            producer: payload.producer.clone(),
            description: payload.description.clone(),
            material: payload.material.clone(),
            images,
            variants,
        }
    }
}

/// Product repository kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `product` as if it had been saved before
    pub fn seed(&self, product: Product) {
        self.state.lock().products.insert(product.id.clone(), product);
    }

    /// Make the next call fail with `err`
    pub fn fail_next(&self, err: PersistenceError) {
        self.state.lock().fail_next = Some(err);
    }

    pub fn get(&self, id: &str) -> Option<Product> {
        self.state.lock().products.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().products.is_empty()
    }

    /// Every image reference deleted so far, in deletion order
    pub fn deleted_images(&self) -> Vec<String> {
        self.state.lock().deleted_images.clone()
    }
}

#[async_trait]
impl ProductRepository for InMemoryRepository {
    async fn fetch(&self, id: &str) -> PersistenceResult<Product> {
        let mut state = self.state.lock();
        state.take_failure()?;
        state
            .products
            .get(id)
            .cloned()
            .ok_or_else(|| PersistenceError::not_found(id))
    }

    async fn create(&self, product: &ProductPayload) -> PersistenceResult<Product> {
        let mut state = self.state.lock();
        state.take_failure()?;
        let id = state.next_id("prod");
        let created = state.materialize(id.clone(), product);
        state.products.insert(id, created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &str,
        product: &ProductPayload,
        removed_images: &[String],
    ) -> PersistenceResult<Product> {
        let mut state = self.state.lock();
        state.take_failure()?;
        let stored = state
            .products
            .get(id)
            .cloned()
            .ok_or_else(|| PersistenceError::not_found(id))?;

        let mut updated = state.materialize(id.to_string(), product);

        // Persisted images neither re-sent nor removed are kept
        for image in stored.images {
            let url = String::from(image.clone());
            if removed_images.contains(&url) {
                state.deleted_images.push(url);
            } else if !updated.images.contains(&image) {
                updated.images.push(image);
            }
        }

        state.products.insert(id.to_string(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> PersistenceResult<()> {
        let mut state = self.state.lock();
        state.take_failure()?;
        let removed = state
            .products
            .remove(id)
            .ok_or_else(|| PersistenceError::not_found(id))?;
        state
            .deleted_images
            .extend(removed.images.into_iter().map(String::from));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::error::ErrorCode;
    use shared::{InlineImage, SizePayload, VariantPayload};

    fn payload(images: Vec<ImageRef>) -> ProductPayload {
        ProductPayload {
            id: None,
            name: "Loafer".to_string(),
            product_type: "shoes".to_string(),
            price: Decimal::new(8900, 2),
            producer: "Marche".to_string(),
            description: "Leather loafer".to_string(),
            material: "leather".to_string(),
            images,
            variants: vec![VariantPayload {
                id: None,
                color: "brown".to_string(),
                sizes: vec![SizePayload {
                    id: None,
                    label: "41".to_string(),
                    stock: 2,
                }],
            }],
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_stores_uploads() {
        let repo = InMemoryRepository::new();
        let created = repo
            .create(&payload(vec![InlineImage::from_bytes("image/png", b"x").into()]))
            .await
            .unwrap();

        assert!(created.id.starts_with("prod-"));
        assert!(created.variants[0].id.starts_with("var-"));
        assert!(created.variants[0].sizes[0].id.starts_with("size-"));
        let url = created.images[0].as_remote().unwrap();
        assert!(url.starts_with(MEMORY_IMAGE_BASE));
        assert!(url.ends_with(".png"));
        assert_eq!(repo.fetch(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_update_keeps_unlisted_and_deletes_removed() {
        let repo = InMemoryRepository::new();
        let a = ImageRef::remote("https://cdn.example.com/a.jpg");
        let b = ImageRef::remote("https://cdn.example.com/b.jpg");
        let c = ImageRef::remote("https://cdn.example.com/c.jpg");
        let created = repo
            .create(&payload(vec![a.clone(), b.clone(), c.clone()]))
            .await
            .unwrap();

        // `a` removed, `c` simply not re-sent
        let mut next = payload(vec![b.clone()]);
        next.id = Some(created.id.clone());
        next.variants[0].id = Some(created.variants[0].id.clone());
        let updated = repo
            .update(&created.id, &next, &["https://cdn.example.com/a.jpg".to_string()])
            .await
            .unwrap();

        assert_eq!(updated.images, vec![b, c]);
        assert_eq!(updated.variants[0].id, created.variants[0].id);
        assert_eq!(repo.deleted_images(), vec!["https://cdn.example.com/a.jpg"]);
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let repo = InMemoryRepository::new();
        repo.fail_next(PersistenceError::new(ErrorCode::NetworkError, "offline"));

        let err = repo.create(&payload(Vec::new())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NetworkError);
        assert!(repo.is_empty());

        assert!(repo.create(&payload(Vec::new())).await.is_ok());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_product() {
        let repo = InMemoryRepository::new();
        assert!(repo.fetch("nope").await.unwrap_err().is_not_found());
        assert!(repo.delete("nope").await.unwrap_err().is_not_found());
        assert!(
            repo.update("nope", &payload(Vec::new()), &[])
                .await
                .unwrap_err()
                .is_not_found()
        );
    }
}
