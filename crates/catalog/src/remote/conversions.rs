//! Normalization of raw API entities into local records.

use vitrine_core::{Price, ProductId, UserId};

use crate::models::product::thumbnail_or_placeholder;
use crate::models::user::{DEFAULT_FIRST_NAME, DEFAULT_LAST_NAME};
use crate::models::{IdAllocator, Product, User, translate_category, truncate_description};

use super::types::{RawProduct, RawUser};

/// `Some(s)` when `s` is present and non-empty.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Normalize a page of raw users.
///
/// Identifiers are kept when present and unique within the page; missing or
/// repeated identifiers are replaced by fresh ones.
#[must_use]
pub fn normalize_users(raw: Vec<RawUser>) -> Vec<User> {
    let mut ids = IdAllocator::new();
    raw.into_iter().map(|u| normalize_user(u, &mut ids)).collect()
}

fn normalize_user(raw: RawUser, ids: &mut IdAllocator) -> User {
    User {
        id: UserId::new(ids.claim_or_allocate(raw.id)),
        first_name: non_empty(raw.first_name).unwrap_or_else(|| DEFAULT_FIRST_NAME.to_string()),
        last_name: non_empty(raw.last_name).unwrap_or_else(|| DEFAULT_LAST_NAME.to_string()),
        email: raw.email.unwrap_or_default(),
        age: raw.age.filter(|years| years.abs() > 0.0),
        image: non_empty(raw.image)
            .or_else(|| non_empty(raw.avatar))
            .unwrap_or_default(),
    }
}

/// Normalize a page of raw products.
///
/// Categories are translated and descriptions truncated here, once.
#[must_use]
pub fn normalize_products(raw: Vec<RawProduct>) -> Vec<Product> {
    let mut ids = IdAllocator::new();
    raw.into_iter()
        .map(|p| normalize_product(p, &mut ids))
        .collect()
}

fn normalize_product(raw: RawProduct, ids: &mut IdAllocator) -> Product {
    let price = raw.price.map_or(Price::ZERO, |amount| {
        Price::from_f64(amount).unwrap_or_else(|e| {
            tracing::warn!(product_id = ?raw.id, error = %e, "Replacing invalid price with zero");
            Price::ZERO
        })
    });

    Product {
        id: ProductId::new(ids.claim_or_allocate(raw.id)),
        title: raw.title.unwrap_or_default(),
        brand: raw.brand.unwrap_or_default(),
        category: translate_category(raw.category.as_deref().unwrap_or_default()),
        description: truncate_description(raw.description.as_deref().unwrap_or_default()),
        price,
        thumbnail: thumbnail_or_placeholder(raw.thumbnail.as_deref()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::models::product::PLACEHOLDER_THUMBNAIL;
    use crate::remote::types::{ProductsEnvelope, UsersEnvelope};

    #[test]
    fn test_user_keeps_present_fields() {
        let users = normalize_users(vec![RawUser {
            id: Some(1),
            first_name: Some("Emily".to_string()),
            last_name: Some("Johnson".to_string()),
            email: Some("emily.johnson@x.dummyjson.com".to_string()),
            age: Some(28.0),
            image: Some("https://dummyjson.com/icon/emilys/128".to_string()),
            avatar: None,
        }]);

        assert_eq!(users.len(), 1);
        let user = &users[0];
        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.full_name(), "Emily Johnson");
        assert_eq!(user.age, Some(28.0));
        assert_eq!(user.image, "https://dummyjson.com/icon/emilys/128");
    }

    #[test]
    fn test_user_defaults() {
        let users = normalize_users(vec![RawUser::default()]);
        let user = &users[0];
        assert_eq!(user.first_name, "Nome");
        assert_eq!(user.last_name, "Sobrenome");
        assert_eq!(user.email, "");
        assert_eq!(user.age, None);
        assert_eq!(user.image, "");
    }

    #[test]
    fn test_user_empty_names_are_defaulted() {
        let users = normalize_users(vec![RawUser {
            first_name: Some(String::new()),
            last_name: Some(String::new()),
            ..RawUser::default()
        }]);
        assert_eq!(users[0].full_name(), "Nome Sobrenome");
    }

    #[test]
    fn test_user_image_falls_back_to_avatar() {
        let users = normalize_users(vec![
            RawUser {
                id: Some(1),
                avatar: Some("https://i.pravatar.cc/150".to_string()),
                ..RawUser::default()
            },
            RawUser {
                id: Some(2),
                image: Some(String::new()),
                avatar: Some("https://i.pravatar.cc/151".to_string()),
                ..RawUser::default()
            },
        ]);
        assert_eq!(users[0].image, "https://i.pravatar.cc/150");
        assert_eq!(users[1].image, "https://i.pravatar.cc/151");
    }

    #[test]
    fn test_user_zero_age_is_empty() {
        let users = normalize_users(vec![RawUser {
            age: Some(0.0),
            ..RawUser::default()
        }]);
        assert_eq!(users[0].age, None);
    }

    #[test]
    fn test_ids_are_unique_within_page() {
        let users = normalize_users(vec![
            RawUser {
                id: Some(7),
                ..RawUser::default()
            },
            RawUser {
                id: Some(7),
                ..RawUser::default()
            },
            RawUser::default(),
            RawUser::default(),
        ]);
        let ids: HashSet<UserId> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(users[0].id, UserId::new(7));
    }

    #[test]
    fn test_malformed_fields_do_not_discard_the_page() {
        let envelope: UsersEnvelope = serde_json::from_str(
            r#"{"users":[{"id":1,"firstName":"Emily"},{"id":"u-2","age":"35"}]}"#,
        )
        .unwrap();
        let users = normalize_users(envelope.users);

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, UserId::new(1));
        assert_ne!(users[1].id, UserId::new(1));
        assert_eq!(users[1].full_name(), "Nome Sobrenome");
        assert_eq!(users[1].age, Some(35.0));

        let envelope: ProductsEnvelope =
            serde_json::from_str(r#"{"products":[{"id":4,"price":"9.99"}]}"#).unwrap();
        let products = normalize_products(envelope.products);
        assert_eq!(products[0].price, Price::parse("9.99").unwrap());
    }

    #[test]
    fn test_product_normalization() {
        let products = normalize_products(vec![RawProduct {
            id: Some(1),
            title: Some("iPhone 9".to_string()),
            brand: Some("Apple".to_string()),
            category: Some("smartphones".to_string()),
            description: Some("a".repeat(71)),
            price: Some(549.0),
            thumbnail: Some("https://cdn.dummyjson.com/1/thumbnail.jpg".to_string()),
        }]);

        let product = &products[0];
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.category, "Celulares");
        assert_eq!(product.description, format!("{}...", "a".repeat(70)));
        assert_eq!(product.price, Price::parse("549").unwrap());
        assert_eq!(product.thumbnail, "https://cdn.dummyjson.com/1/thumbnail.jpg");
    }

    #[test]
    fn test_product_defaults() {
        let products = normalize_products(vec![RawProduct::default()]);
        let product = &products[0];
        assert_eq!(product.title, "");
        assert_eq!(product.brand, "");
        assert_eq!(product.category, "");
        assert_eq!(product.description, "");
        assert_eq!(product.price, Price::ZERO);
        assert_eq!(product.thumbnail, PLACEHOLDER_THUMBNAIL);
    }

    #[test]
    fn test_product_negative_price_becomes_zero() {
        let products = normalize_products(vec![RawProduct {
            price: Some(-5.0),
            ..RawProduct::default()
        }]);
        assert_eq!(products[0].price, Price::ZERO);
    }

    #[test]
    fn test_unknown_category_passes_through() {
        let products = normalize_products(vec![RawProduct {
            category: Some("beauty".to_string()),
            ..RawProduct::default()
        }]);
        assert_eq!(products[0].category, "beauty");
    }
}
