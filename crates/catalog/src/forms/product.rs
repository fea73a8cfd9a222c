//! The product entry form. Nothing is rejected; input is coerced.

use tracing::{instrument, warn};
use vitrine_core::{Price, ProductId};

use crate::error::{CatalogError, Result};
use crate::models::product::thumbnail_or_placeholder;
use crate::models::{Product, truncate_description};
use crate::store::KeyValueStore;
use crate::sync::Catalog;

/// Raw product input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub title: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub price: String,
    pub thumbnail: String,
}

impl ProductForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill the form with an existing record's values.
    #[must_use]
    pub fn from_record(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            price: product.price.amount().to_string(),
            thumbnail: product.thumbnail.clone(),
        }
    }

    /// Prefill the form from the record at render position `position`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::PositionOutOfRange`] if there is no such record.
    pub fn seeded_from<S: KeyValueStore>(
        catalog: &Catalog<Product, S>,
        position: usize,
    ) -> Result<Self> {
        catalog
            .get(position)
            .map(Self::from_record)
            .ok_or(CatalogError::PositionOutOfRange {
                position,
                len: catalog.len(),
            })
    }

    /// Build a record from the form.
    ///
    /// Text is trimmed, the description truncated, and a blank thumbnail
    /// replaced by the placeholder. The category is kept as typed.
    #[must_use]
    pub fn to_product(&self, id: ProductId) -> Product {
        Product {
            id,
            title: self.title.trim().to_string(),
            brand: self.brand.trim().to_string(),
            category: self.category.trim().to_string(),
            description: truncate_description(self.description.trim()),
            price: lenient_price(&self.price),
            thumbnail: thumbnail_or_placeholder(Some(&self.thumbnail)),
        }
    }

    /// Append the new product to `catalog` and reset the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails; the form is kept.
    #[instrument(skip_all)]
    pub fn submit<S: KeyValueStore>(&mut self, catalog: &mut Catalog<Product, S>) -> Result<Product> {
        let product = self.to_product(ProductId::new(catalog.fresh_id()));
        catalog.append(product.clone())?;
        *self = Self::default();
        Ok(product)
    }
}

/// Blank input is zero. Unparseable or negative input is zero with a warning.
fn lenient_price(raw: &str) -> Price {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Price::ZERO;
    }

    Price::parse(trimmed)
        .or_else(|e| {
            // Exponent notation such as `1e3` is not accepted by the decimal parser.
            trimmed
                .parse::<f64>()
                .map_err(|_| e)
                .and_then(Price::from_f64)
        })
        .unwrap_or_else(|e| {
            warn!(input = trimmed, error = %e, "Replacing invalid price with zero");
            Price::ZERO
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::product::PLACEHOLDER_THUMBNAIL;
    use crate::store::{MemoryStore, SnapshotStore};

    fn iphone() -> Product {
        Product {
            id: ProductId::new(1),
            title: "iPhone 9".to_string(),
            brand: "Apple".to_string(),
            category: "Celulares".to_string(),
            description: "An apple mobile".to_string(),
            price: Price::parse("549").unwrap(),
            thumbnail: "https://cdn.dummyjson.com/1/thumbnail.jpg".to_string(),
        }
    }

    fn catalog(records: Vec<Product>) -> (Catalog<Product, MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        (
            Catalog::ready(records, SnapshotStore::new(store.clone())),
            store,
        )
    }

    #[test]
    fn test_lenient_price() {
        assert_eq!(lenient_price(""), Price::ZERO);
        assert_eq!(lenient_price("abc"), Price::ZERO);
        assert_eq!(lenient_price("-3"), Price::ZERO);
        assert_eq!(lenient_price(" 19.90 "), Price::parse("19.9").unwrap());
        assert_eq!(lenient_price("1e3"), Price::parse("1000").unwrap());
    }

    #[test]
    fn test_to_product_coerces_input() {
        let form = ProductForm {
            title: "  Caneca ".to_string(),
            brand: "Casa".to_string(),
            category: "smartphones".to_string(),
            description: "d".repeat(80),
            price: "oops".to_string(),
            thumbnail: "   ".to_string(),
        };

        let product = form.to_product(ProductId::new(9));
        assert_eq!(product.title, "Caneca");
        assert_eq!(product.category, "smartphones");
        assert_eq!(product.description, format!("{}...", "d".repeat(70)));
        assert_eq!(product.price, Price::ZERO);
        assert_eq!(product.thumbnail, PLACEHOLDER_THUMBNAIL);
    }

    #[test]
    fn test_duplicate_gets_fresh_id_and_lands_last() {
        let (mut products, store) = catalog(vec![iphone()]);

        let mut form = ProductForm::seeded_from(&products, 0).unwrap();
        assert_eq!(form.title, "iPhone 9");
        assert_eq!(form.price, "549");
        form.title = "iPhone 9 Pro".to_string();

        let copy = form.submit(&mut products).unwrap();

        assert_ne!(copy.id, iphone().id);
        assert_eq!(products.len(), 2);
        assert_eq!(products.get(1), Some(&copy));
        assert_eq!(copy.price, iphone().price);
        assert_eq!(form, ProductForm::new());
        let stored = SnapshotStore::<Product, _>::new(store).load().into_records();
        assert_eq!(stored, products.records());
    }

    #[test]
    fn test_entered_price_survives_the_snapshot() {
        let (mut products, store) = catalog(vec![iphone()]);
        let mut form = ProductForm {
            title: "Caneta".to_string(),
            price: "19.999999999999999999".to_string(),
            ..ProductForm::default()
        };

        let added = form.submit(&mut products).unwrap();

        assert_eq!(added.price, Price::parse("20").unwrap());
        let stored = SnapshotStore::<Product, _>::new(store).load().into_records();
        assert_eq!(stored, products.records());
    }

    #[test]
    fn test_seeding_from_missing_position_fails() {
        let (products, _) = catalog(vec![iphone()]);
        let err = ProductForm::seeded_from(&products, 3).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::PositionOutOfRange {
                position: 3,
                len: 1
            }
        ));
    }
}
