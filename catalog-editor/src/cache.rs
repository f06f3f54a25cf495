//! Product cache with targeted invalidation
//!
//! A save or delete touches exactly one entry and publishes one event;
//! views that depend on that product subscribe and refetch only what changed.

use parking_lot::RwLock;
use serde::Serialize;
use shared::Product;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the invalidation channel
const EVENT_CAPACITY: usize = 64;

/// Cache change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CacheEvent {
    /// Entry replaced by the server's authoritative copy
    ProductReplaced { id: String },
    /// Entry dropped after a delete
    ProductRemoved { id: String },
}

/// Shared product cache (cheap to clone)
#[derive(Debug, Clone)]
pub struct ProductCache {
    products: Arc<RwLock<HashMap<String, Product>>>,
    events: broadcast::Sender<CacheEvent>,
}

impl ProductCache {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
            events,
        }
    }

    pub fn get(&self, id: &str) -> Option<Product> {
        self.products.read().get(id).cloned()
    }

    /// Store a freshly fetched product without notifying anyone
    pub fn insert(&self, product: Product) {
        self.products.write().insert(product.id.clone(), product);
    }

    /// Replace one entry and notify subscribers
    pub fn replace(&self, product: Product) {
        let id = product.id.clone();
        self.products.write().insert(id.clone(), product);
        tracing::debug!(product_id = %id, "Cache entry replaced");
        // No subscribers is fine
        let _ = self.events.send(CacheEvent::ProductReplaced { id });
    }

    /// Drop one entry and notify subscribers
    pub fn remove(&self, id: &str) -> Option<Product> {
        let removed = self.products.write().remove(id);
        tracing::debug!(product_id = %id, "Cache entry removed");
        let _ = self.events.send(CacheEvent::ProductRemoved { id: id.to_string() });
        removed
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }
}

impl Default for ProductCache {
    fn default() -> Self {
        Self::new()
    }
}
