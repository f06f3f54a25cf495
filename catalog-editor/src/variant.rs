//! Variant / size editing
//!
//! Every operation takes the current variant list and returns a fresh one;
//! the input is never touched, so a refused edit leaves the caller's snapshot
//! as it was. Elements are addressed by current position. After an add or a
//! remove, positions shift and must be read again from the new list; callers
//! that hold a position across an await should re-resolve it with
//! [`position_of_variant`] / [`position_of_size`].

use crate::error::EditBlocked;
use crate::id::{TempIdAllocator, TempIdKind};
use shared::{Size, Variant};

/// Editable size field with its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeField {
    /// Size label; must not be blank
    Label(String),
    /// Units in stock; must not be negative
    Stock(i32),
}

impl SizeField {
    /// Parse user input for the stock field
    pub fn parse_stock(input: &str) -> Result<Self, EditBlocked> {
        match input.trim().parse::<i32>() {
            Ok(stock) if stock >= 0 => Ok(Self::Stock(stock)),
            _ => Err(EditBlocked::InvalidStock {
                input: input.to_string(),
            }),
        }
    }
}

/// Placeholder size: temporary id, empty label, zero stock
pub fn new_size(ids: &TempIdAllocator) -> Size {
    Size {
        id: ids.next(TempIdKind::Size),
        label: String::new(),
        stock: 0,
    }
}

/// Placeholder variant with one placeholder size
pub fn new_variant(ids: &TempIdAllocator) -> Variant {
    Variant {
        id: ids.next(TempIdKind::Variant),
        color: String::new(),
        sizes: vec![new_size(ids)],
    }
}

fn variant_mut(variants: &mut [Variant], index: usize) -> Result<&mut Variant, EditBlocked> {
    variants
        .get_mut(index)
        .ok_or(EditBlocked::VariantOutOfRange { index })
}

fn size_mut(variant: &mut Variant, variant_index: usize, index: usize) -> Result<&mut Size, EditBlocked> {
    variant.sizes.get_mut(index).ok_or(EditBlocked::SizeOutOfRange {
        variant: variant_index,
        size: index,
    })
}

/// Append a placeholder variant
pub fn add_variant(variants: &[Variant], ids: &TempIdAllocator) -> Vec<Variant> {
    let mut next = variants.to_vec();
    next.push(new_variant(ids));
    next
}

/// Remove the variant at `index`; the last remaining variant cannot go
pub fn remove_variant(variants: &[Variant], index: usize) -> Result<Vec<Variant>, EditBlocked> {
    if index >= variants.len() {
        return Err(EditBlocked::VariantOutOfRange { index });
    }
    if variants.len() == 1 {
        tracing::debug!("Refusing to remove the last variant");
        return Err(EditBlocked::LastVariant);
    }
    let mut next = variants.to_vec();
    next.remove(index);
    Ok(next)
}

/// Set the color of the variant at `index`
///
/// Blank colors are accepted here and reported by validation on submit.
pub fn update_variant_color(
    variants: &[Variant],
    index: usize,
    color: impl Into<String>,
) -> Result<Vec<Variant>, EditBlocked> {
    let mut next = variants.to_vec();
    variant_mut(&mut next, index)?.color = color.into();
    Ok(next)
}

/// Append a placeholder size to the variant at `variant_index`
pub fn add_size(
    variants: &[Variant],
    variant_index: usize,
    ids: &TempIdAllocator,
) -> Result<Vec<Variant>, EditBlocked> {
    let mut next = variants.to_vec();
    variant_mut(&mut next, variant_index)?.sizes.push(new_size(ids));
    Ok(next)
}

/// Remove one size; a variant keeps at least one
pub fn remove_size(
    variants: &[Variant],
    variant_index: usize,
    size_index: usize,
) -> Result<Vec<Variant>, EditBlocked> {
    let mut next = variants.to_vec();
    let variant = variant_mut(&mut next, variant_index)?;
    if size_index >= variant.sizes.len() {
        return Err(EditBlocked::SizeOutOfRange {
            variant: variant_index,
            size: size_index,
        });
    }
    if variant.sizes.len() == 1 {
        tracing::debug!(variant = variant_index, "Refusing to remove the last size");
        return Err(EditBlocked::LastSize {
            variant: variant_index,
        });
    }
    variant.sizes.remove(size_index);
    Ok(next)
}

/// Update one field of a size
///
/// A blank label or a negative stock is refused and the previous value kept.
/// Labels are stored as typed.
pub fn update_size(
    variants: &[Variant],
    variant_index: usize,
    size_index: usize,
    field: SizeField,
) -> Result<Vec<Variant>, EditBlocked> {
    let mut next = variants.to_vec();
    let size = size_mut(variant_mut(&mut next, variant_index)?, variant_index, size_index)?;
    match field {
        SizeField::Label(label) => {
            if label.trim().is_empty() {
                return Err(EditBlocked::EmptySizeLabel);
            }
            size.label = label;
        }
        SizeField::Stock(stock) => {
            if stock < 0 {
                return Err(EditBlocked::InvalidStock {
                    input: stock.to_string(),
                });
            }
            size.stock = stock;
        }
    }
    Ok(next)
}

/// Current position of the variant with id `id`
pub fn position_of_variant(variants: &[Variant], id: &str) -> Option<usize> {
    variants.iter().position(|v| v.id == id)
}

/// Current `(variant, size)` position of a size, by ids
pub fn position_of_size(variants: &[Variant], variant_id: &str, size_id: &str) -> Option<(usize, usize)> {
    let vi = position_of_variant(variants, variant_id)?;
    let si = variants[vi].sizes.iter().position(|s| s.id == size_id)?;
    Some((vi, si))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::util::is_temp_id;

    fn size(id: &str, label: &str, stock: i32) -> Size {
        Size {
            id: id.to_string(),
            label: label.to_string(),
            stock,
        }
    }

    fn two_variants() -> Vec<Variant> {
        vec![
            Variant {
                id: "v1".to_string(),
                color: "red".to_string(),
                sizes: vec![size("s1", "S", 1), size("s2", "M", 2)],
            },
            Variant {
                id: "v2".to_string(),
                color: "blue".to_string(),
                sizes: vec![size("s3", "L", 0)],
            },
        ]
    }

    #[test]
    fn test_add_variant_has_one_placeholder_size() {
        let ids = TempIdAllocator::with_nonce("t");
        let before = two_variants();
        let after = add_variant(&before, &ids);

        assert_eq!(before.len(), 2);
        assert_eq!(after.len(), 3);
        let added = &after[2];
        assert!(is_temp_id(&added.id));
        assert_eq!(added.sizes.len(), 1);
        assert!(is_temp_id(&added.sizes[0].id));
        assert_eq!(added.sizes[0].label, "");
        assert_eq!(added.sizes[0].stock, 0);
    }

    #[test]
    fn test_remove_first_of_two_variants() {
        let variants = two_variants();
        let after = remove_variant(&variants, 0).unwrap();
        assert_eq!(after, vec![variants[1].clone()]);
    }

    #[test]
    fn test_remove_last_variant_blocked() {
        let one = vec![two_variants().remove(1)];
        assert_eq!(remove_variant(&one, 0), Err(EditBlocked::LastVariant));
        assert_eq!(
            remove_variant(&one, 3),
            Err(EditBlocked::VariantOutOfRange { index: 3 })
        );
    }

    #[test]
    fn test_remove_size() {
        let variants = two_variants();
        let after = remove_size(&variants, 0, 0).unwrap();
        assert_eq!(after[0].sizes, vec![size("s2", "M", 2)]);
        assert_eq!(variants[0].sizes.len(), 2);

        assert_eq!(
            remove_size(&variants, 1, 0),
            Err(EditBlocked::LastSize { variant: 1 })
        );
        assert_eq!(
            remove_size(&variants, 0, 2),
            Err(EditBlocked::SizeOutOfRange { variant: 0, size: 2 })
        );
    }

    #[test]
    fn test_add_size_and_color() {
        let ids = TempIdAllocator::with_nonce("t");
        let variants = two_variants();
        let after = add_size(&variants, 1, &ids).unwrap();
        assert_eq!(after[1].sizes.len(), 2);
        assert!(is_temp_id(&after[1].sizes[1].id));

        let after = update_variant_color(&after, 1, "navy").unwrap();
        assert_eq!(after[1].color, "navy");
        assert_eq!(variants[1].color, "blue");

        assert_eq!(
            add_size(&variants, 9, &ids),
            Err(EditBlocked::VariantOutOfRange { index: 9 })
        );
    }

    #[test]
    fn test_update_size_fields() {
        let variants = two_variants();

        let after = update_size(&variants, 0, 1, SizeField::Stock(7)).unwrap();
        assert_eq!(after[0].sizes[1].stock, 7);

        let after = update_size(&after, 0, 1, SizeField::Label(" XL ".to_string())).unwrap();
        assert_eq!(after[0].sizes[1].label, " XL ");

        assert_eq!(
            update_size(&variants, 0, 1, SizeField::Stock(-1)),
            Err(EditBlocked::InvalidStock {
                input: "-1".to_string()
            })
        );
        assert_eq!(
            update_size(&variants, 0, 1, SizeField::Label("   ".to_string())),
            Err(EditBlocked::EmptySizeLabel)
        );
    }

    #[test]
    fn test_parse_stock() {
        assert_eq!(SizeField::parse_stock(" 12 "), Ok(SizeField::Stock(12)));
        assert_eq!(SizeField::parse_stock("0"), Ok(SizeField::Stock(0)));
        for bad in ["-3", "abc", "", "1.5"] {
            assert!(matches!(
                SizeField::parse_stock(bad),
                Err(EditBlocked::InvalidStock { .. })
            ));
        }
    }

    #[test]
    fn test_positions_follow_removals() {
        let variants = two_variants();
        assert_eq!(position_of_variant(&variants, "v2"), Some(1));
        assert_eq!(position_of_size(&variants, "v1", "s2"), Some((0, 1)));

        let after = remove_variant(&variants, 0).unwrap();
        assert_eq!(position_of_variant(&after, "v2"), Some(0));
        assert_eq!(position_of_variant(&after, "v1"), None);
        assert_eq!(position_of_size(&after, "v2", "s3"), Some((0, 0)));
        assert_eq!(position_of_size(&after, "v2", "s1"), None);
    }
}
