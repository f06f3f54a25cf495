//! Product draft
//!
//! A draft is an editable copy of a product plus the snapshot it was opened
//! from. Every change returns a new draft; the previous one stays valid, which
//! is what makes [`ProductDraft::reset`] exact.

use crate::error::EditBlocked;
use crate::gallery::compute_removed_images;
use crate::id::TempIdAllocator;
use crate::validation::{ValidationError, validate};
use crate::variant::new_variant;
use rust_decimal::Decimal;
use shared::{ImageRef, Product, ProductPayload, Variant};
use std::str::FromStr;

/// What a draft is opened from
#[derive(Debug, Clone, PartialEq)]
pub enum DraftSource {
    /// Edit a persisted product
    Existing(Product),
    /// New product: blank fields, one placeholder variant with one size
    Template,
}

/// Editable scalar field with its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductField {
    Name(String),
    Type(String),
    Price(Decimal),
    Producer(String),
    Description(String),
    Material(String),
}

impl ProductField {
    /// Parse user input for the price field
    ///
    /// Any decimal is accepted here; `price > 0` is checked on submit.
    pub fn parse_price(input: &str) -> Result<Self, EditBlocked> {
        Decimal::from_str(input.trim())
            .map(Self::Price)
            .map_err(|_| EditBlocked::InvalidPrice {
                input: input.to_string(),
            })
    }
}

/// Draft ready for the persistence layer
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedPayload {
    /// Product without temporary ids
    pub product: ProductPayload,
    /// Persisted images to delete server-side
    pub removed_images: Vec<String>,
}

/// Editable product snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    product: Product,
    initial: Product,
    original_images: Vec<ImageRef>,
    removed_images: Vec<String>,
}

fn blank_product(ids: &TempIdAllocator) -> Product {
    Product {
        id: String::new(),
        name: String::new(),
        product_type: String::new(),
        price: Decimal::ZERO,
        producer: String::new(),
        description: String::new(),
        material: String::new(),
        images: Vec::new(),
        variants: vec![new_variant(ids)],
    }
}

impl ProductDraft {
    /// Open a draft; template ids come from `ids`
    pub fn open(source: DraftSource, ids: &TempIdAllocator) -> Self {
        let product = match source {
            DraftSource::Existing(product) => product,
            DraftSource::Template => blank_product(ids),
        };
        tracing::debug!(product_id = %product.id, new = product.is_new(), "Draft opened");
        Self {
            original_images: product.images.clone(),
            initial: product.clone(),
            product,
            removed_images: Vec::new(),
        }
    }

    /// Current snapshot
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Snapshot the draft was opened from
    pub fn initial(&self) -> &Product {
        &self.initial
    }

    pub fn original_images(&self) -> &[ImageRef] {
        &self.original_images
    }

    /// Persisted images removed since the draft was opened
    pub fn removed_images(&self) -> &[String] {
        &self.removed_images
    }

    /// Draft for a product the server has not seen yet
    pub fn is_new(&self) -> bool {
        self.product.is_new()
    }

    /// Whether anything changed since the draft was opened
    pub fn is_dirty(&self) -> bool {
        self.product != self.initial
    }

    pub fn apply_field_change(&self, field: ProductField) -> Self {
        let mut next = self.clone();
        let p = &mut next.product;
        match field {
            ProductField::Name(v) => p.name = v,
            ProductField::Type(v) => p.product_type = v,
            ProductField::Price(v) => p.price = v,
            ProductField::Producer(v) => p.producer = v,
            ProductField::Description(v) => p.description = v,
            ProductField::Material(v) => p.material = v,
        }
        next
    }

    pub fn apply_variants_change(&self, variants: Vec<Variant>) -> Self {
        let mut next = self.clone();
        next.product.variants = variants;
        next
    }

    /// Replace the gallery and recompute the removed images
    pub fn apply_images_change(&self, images: Vec<ImageRef>) -> Self {
        let mut next = self.clone();
        next.removed_images = compute_removed_images(&self.original_images, &images)
            .into_iter()
            .map(String::from)
            .collect();
        next.product.images = images;
        next
    }

    /// Back to the opening snapshot, dropping every pending change
    pub fn reset(&self) -> Self {
        Self {
            product: self.initial.clone(),
            initial: self.initial.clone(),
            original_images: self.original_images.clone(),
            removed_images: Vec::new(),
        }
    }

    /// Validate and strip temporary ids
    pub fn prepare_for_submit(&self) -> Result<CleanedPayload, ValidationError> {
        validate(&self.product)?;
        Ok(CleanedPayload {
            product: ProductPayload::from(&self.product),
            removed_images: self.removed_images.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{SizeField, add_variant, update_size, update_variant_color};
    use shared::util::is_temp_id;
    use shared::{InlineImage, Size};

    fn ids() -> TempIdAllocator {
        TempIdAllocator::with_nonce("test")
    }

    fn persisted() -> Product {
        Product {
            id: "p1".to_string(),
            name: "Wool Scarf".to_string(),
            product_type: "scarf".to_string(),
            price: Decimal::new(3500, 2),
            producer: "Highland".to_string(),
            description: "Merino wool scarf".to_string(),
            material: "wool".to_string(),
            images: vec![
                ImageRef::remote("https://cdn.example.com/a.jpg"),
                ImageRef::remote("https://cdn.example.com/b.jpg"),
            ],
            variants: vec![Variant {
                id: "v1".to_string(),
                color: "grey".to_string(),
                sizes: vec![Size {
                    id: "s1".to_string(),
                    label: "one size".to_string(),
                    stock: 10,
                }],
            }],
        }
    }

    fn fill(draft: &ProductDraft) -> ProductDraft {
        let variants = update_variant_color(&draft.product().variants, 0, "black").unwrap();
        let variants = update_size(&variants, 0, 0, SizeField::Label("M".into())).unwrap();
        [
            ProductField::Name("Tee".into()),
            ProductField::Type("t-shirt".into()),
            ProductField::Price(Decimal::new(1999, 2)),
            ProductField::Producer("Acme".into()),
            ProductField::Description("Plain tee".into()),
            ProductField::Material("cotton".into()),
        ]
        .into_iter()
        .fold(draft.apply_variants_change(variants), |d, f| d.apply_field_change(f))
        .apply_images_change(vec![InlineImage::from_bytes("image/png", b"png").into()])
    }

    #[test]
    fn test_template_shape() {
        let draft = ProductDraft::open(DraftSource::Template, &ids());
        let p = draft.product();
        assert!(draft.is_new());
        assert_eq!(p.variants.len(), 1);
        assert_eq!(p.variants[0].sizes.len(), 1);
        assert!(is_temp_id(&p.variants[0].id));
        assert!(is_temp_id(&p.variants[0].sizes[0].id));
        assert_eq!(draft.prepare_for_submit(), Err(ValidationError::NameRequired));
    }

    #[test]
    fn test_changes_do_not_touch_previous_snapshot() {
        let draft = ProductDraft::open(DraftSource::Existing(persisted()), &ids());
        let edited = draft.apply_field_change(ProductField::Name("Cashmere Scarf".into()));

        assert_eq!(draft.product().name, "Wool Scarf");
        assert_eq!(edited.product().name, "Cashmere Scarf");
        assert!(!draft.is_dirty());
        assert!(edited.is_dirty());
    }

    #[test]
    fn test_images_change_tracks_removals() {
        let draft = ProductDraft::open(DraftSource::Existing(persisted()), &ids());
        let b = ImageRef::remote("https://cdn.example.com/b.jpg");

        let edited = draft.apply_images_change(vec![b.clone()]);
        assert_eq!(edited.removed_images(), ["https://cdn.example.com/a.jpg"]);

        // putting it back clears the removal
        let restored = edited.apply_images_change(persisted().images);
        assert!(restored.removed_images().is_empty());
        assert_eq!(restored.original_images(), persisted().images.as_slice());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let draft = ProductDraft::open(DraftSource::Existing(persisted()), &ids());
        let edited = draft
            .apply_field_change(ProductField::Price(Decimal::new(1, 0)))
            .apply_variants_change(add_variant(&draft.product().variants, &ids()))
            .apply_images_change(Vec::new());

        let once = edited.reset();
        let twice = once.reset();
        assert_eq!(once, twice);
        assert_eq!(once.product(), &persisted());
        assert!(once.removed_images().is_empty());
        assert!(!once.is_dirty());
    }

    #[test]
    fn test_prepare_strips_temporary_ids() {
        let allocator = ids();
        let draft = ProductDraft::open(DraftSource::Existing(persisted()), &allocator);
        let draft = draft
            .apply_variants_change(add_variant(&draft.product().variants, &allocator));
        let variants = update_variant_color(&draft.product().variants, 1, "navy").unwrap();
        let variants = update_size(&variants, 1, 0, SizeField::Label("L".into())).unwrap();
        let draft = draft
            .apply_variants_change(variants)
            .apply_images_change(vec![ImageRef::remote("https://cdn.example.com/b.jpg")]);

        let cleaned = draft.prepare_for_submit().unwrap();
        assert_eq!(cleaned.product.id.as_deref(), Some("p1"));
        assert_eq!(cleaned.product.variants[0].id.as_deref(), Some("v1"));
        assert_eq!(cleaned.product.variants[1].id, None);
        assert_eq!(cleaned.product.variants[1].sizes[0].id, None);
        assert_eq!(cleaned.removed_images, vec!["https://cdn.example.com/a.jpg"]);

        let json = serde_json::to_string(&cleaned.product).unwrap();
        assert!(!json.contains("tmp-"));
    }

    #[test]
    fn test_new_product_payload_has_no_ids() {
        let draft = fill(&ProductDraft::open(DraftSource::Template, &ids()));
        let cleaned = draft.prepare_for_submit().unwrap();
        assert_eq!(cleaned.product.id, None);
        assert!(cleaned.product.variants.iter().all(|v| v.id.is_none()));
        assert!(cleaned.removed_images.is_empty());
        assert_eq!(cleaned.product.pending_image_count(), 1);
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(
            ProductField::parse_price(" 19.90 "),
            Ok(ProductField::Price(Decimal::new(1990, 2)))
        );
        assert!(matches!(
            ProductField::parse_price("free"),
            Err(EditBlocked::InvalidPrice { .. })
        ));
    }
}
