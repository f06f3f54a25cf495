//! Submission rules
//!
//! Rules run in a fixed order and stop at the first failure, so the same draft
//! always reports the same error:
//!
//! 1. name, type, price > 0, producer, description, material
//! 2. at least one image, at most [`MAX_IMAGES`]
//! 3. at least one variant
//! 4. per variant, in order: sizes present, color present, then per size:
//!    label present, stock >= 0
//!
//! "Present" means not blank after trimming.

use crate::gallery::MAX_IMAGES;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::Product;
use thiserror::Error;

/// First rule a draft violates
///
/// Variant and size positions are zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,

    #[error("Type is required")]
    TypeRequired,

    #[error("Price must be greater than zero")]
    PriceNotPositive,

    #[error("Producer is required")]
    ProducerRequired,

    #[error("Description is required")]
    DescriptionRequired,

    #[error("Material is required")]
    MaterialRequired,

    #[error("At least one image is required")]
    ImagesRequired,

    #[error("At most {max} images are allowed, got {count}")]
    TooManyImages { count: usize, max: usize },

    #[error("At least one variant is required")]
    VariantsRequired,

    #[error("Variant {} needs at least one size", variant + 1)]
    SizesRequired { variant: usize },

    #[error("Color of variant {} is required", variant + 1)]
    ColorRequired { variant: usize },

    #[error("Size {} of variant {} needs a label", size + 1, variant + 1)]
    SizeLabelRequired { variant: usize, size: usize },

    #[error("Stock of size {} in variant {} cannot be negative", size + 1, variant + 1)]
    NegativeStock {
        variant: usize,
        size: usize,
        stock: i32,
    },
}

impl ValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NameRequired
            | Self::TypeRequired
            | Self::ProducerRequired
            | Self::DescriptionRequired
            | Self::MaterialRequired => ErrorCode::ProductFieldRequired,
            Self::PriceNotPositive => ErrorCode::ProductInvalidPrice,
            Self::ImagesRequired => ErrorCode::ProductImagesRequired,
            Self::TooManyImages { .. } => ErrorCode::ProductImageLimit,
            Self::VariantsRequired => ErrorCode::VariantRequired,
            Self::SizesRequired { .. } => ErrorCode::SizeRequired,
            Self::ColorRequired { .. } => ErrorCode::VariantColorRequired,
            Self::SizeLabelRequired { .. } => ErrorCode::SizeLabelRequired,
            Self::NegativeStock { .. } => ErrorCode::SizeInvalidStock,
        }
    }

    /// Form field the error belongs to, for highlighting
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameRequired => "name",
            Self::TypeRequired => "type",
            Self::PriceNotPositive => "price",
            Self::ProducerRequired => "producer",
            Self::DescriptionRequired => "description",
            Self::MaterialRequired => "material",
            Self::ImagesRequired | Self::TooManyImages { .. } => "images",
            Self::VariantsRequired | Self::SizesRequired { .. } => "variants",
            Self::ColorRequired { .. } => "color",
            Self::SizeLabelRequired { .. } => "size",
            Self::NegativeStock { .. } => "stock",
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let mut app = AppError::with_message(err.code(), err.to_string())
            .with_detail("field", err.field());
        match err {
            ValidationError::SizesRequired { variant }
            | ValidationError::ColorRequired { variant } => {
                app = app.with_detail("variant", variant);
            }
            ValidationError::SizeLabelRequired { variant, size }
            | ValidationError::NegativeStock { variant, size, .. } => {
                app = app.with_detail("variant", variant).with_detail("size", size);
            }
            _ => {}
        }
        app
    }
}

fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

fn require(ok: bool, err: ValidationError) -> Result<(), ValidationError> {
    if ok { Ok(()) } else { Err(err) }
}

/// Check `product` against every submission rule, in order
pub fn validate(product: &Product) -> Result<(), ValidationError> {
    require(present(&product.name), ValidationError::NameRequired)?;
    require(present(&product.product_type), ValidationError::TypeRequired)?;
    require(product.price > Decimal::ZERO, ValidationError::PriceNotPositive)?;
    require(present(&product.producer), ValidationError::ProducerRequired)?;
    require(present(&product.description), ValidationError::DescriptionRequired)?;
    require(present(&product.material), ValidationError::MaterialRequired)?;

    require(!product.images.is_empty(), ValidationError::ImagesRequired)?;
    require(
        product.images.len() <= MAX_IMAGES,
        ValidationError::TooManyImages {
            count: product.images.len(),
            max: MAX_IMAGES,
        },
    )?;

    require(!product.variants.is_empty(), ValidationError::VariantsRequired)?;
    for (vi, variant) in product.variants.iter().enumerate() {
        require(
            !variant.sizes.is_empty(),
            ValidationError::SizesRequired { variant: vi },
        )?;
        require(
            present(&variant.color),
            ValidationError::ColorRequired { variant: vi },
        )?;
        for (si, size) in variant.sizes.iter().enumerate() {
            require(
                present(&size.label),
                ValidationError::SizeLabelRequired {
                    variant: vi,
                    size: si,
                },
            )?;
            require(
                size.stock >= 0,
                ValidationError::NegativeStock {
                    variant: vi,
                    size: si,
                    stock: size.stock,
                },
            )?;
        }
    }
    Ok(())
}
