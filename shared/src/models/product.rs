//! Product Model

use super::image::ImageRef;
use crate::util::is_temp_id;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity
///
/// `id` is empty for a product that has never been saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    /// Product type (e.g. "dress", "sneakers")
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub producer: String,
    pub description: String,
    pub material: String,
    /// Gallery images, display order
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Product {
    /// Whether the server has assigned an id yet
    pub fn is_new(&self) -> bool {
        self.id.is_empty()
    }
}

/// Color variant of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Persisted id or a temporary id
    #[serde(rename = "_id", default)]
    pub id: String,
    pub color: String,
    #[serde(default)]
    pub sizes: Vec<Size>,
}

/// Size entry of a variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Persisted id or a temporary id
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Size label (e.g. "M", "42")
    #[serde(rename = "size")]
    pub label: String,
    pub stock: i32,
}

// =============================================================================
// Persistence payloads
// =============================================================================

/// Cleaned product sent to create/update
///
/// Entities without a server id carry no `_id` at all so the server
/// allocates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub producer: String,
    pub description: String,
    pub material: String,
    pub images: Vec<ImageRef>,
    pub variants: Vec<VariantPayload>,
}

/// Cleaned variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPayload {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    pub color: String,
    pub sizes: Vec<SizePayload>,
}

/// Cleaned size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizePayload {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    #[serde(rename = "size")]
    pub label: String,
    pub stock: i32,
}

/// Keep only ids the server handed out
fn server_id(id: &str) -> Option<String> {
    if id.is_empty() || is_temp_id(id) {
        None
    } else {
        Some(id.to_string())
    }
}

impl From<&Size> for SizePayload {
    fn from(size: &Size) -> Self {
        Self {
            id: server_id(&size.id),
            label: size.label.clone(),
            stock: size.stock,
        }
    }
}

impl From<&Variant> for VariantPayload {
    fn from(variant: &Variant) -> Self {
        Self {
            id: server_id(&variant.id),
            color: variant.color.clone(),
            sizes: variant.sizes.iter().map(SizePayload::from).collect(),
        }
    }
}

impl From<&Product> for ProductPayload {
    fn from(product: &Product) -> Self {
        Self {
            id: server_id(&product.id),
            name: product.name.clone(),
            product_type: product.product_type.clone(),
            price: product.price,
            producer: product.producer.clone(),
            description: product.description.clone(),
            material: product.material.clone(),
            images: product.images.clone(),
            variants: product.variants.iter().map(VariantPayload::from).collect(),
        }
    }
}

impl ProductPayload {
    /// Persisted image references kept as-is
    pub fn existing_images(&self) -> Vec<&str> {
        self.images.iter().filter_map(ImageRef::as_remote).collect()
    }

    /// Number of images that travel as binary attachments
    pub fn pending_image_count(&self) -> usize {
        self.images.iter().filter(|img| img.is_pending()).count()
    }
}
