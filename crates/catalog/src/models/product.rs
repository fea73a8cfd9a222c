//! Product records and their ingestion rules.

use serde::{Deserialize, Serialize};
use vitrine_core::{Price, ProductId};

use super::{Entity, EntityKind};

/// Descriptions longer than this many characters are cut at ingestion.
pub const DESCRIPTION_MAX_CHARS: usize = 70;

/// Marker appended to a cut description.
pub const ELLIPSIS: &str = "...";

/// Thumbnail used when a product has none.
pub const PLACEHOLDER_THUMBNAIL: &str = "https://via.placeholder.com/150";

/// Remote category slugs and their display names.
const CATEGORY_NAMES: &[(&str, &str)] = &[
    ("smartphones", "Celulares"),
    ("laptops", "Notebooks"),
    ("fragrances", "Perfumes"),
    ("skincare", "Cuidados com Pele"),
    ("groceries", "Mercado"),
    ("home-decoration", "Decoração"),
];

/// A product as kept in the in-memory collection and the local snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub brand: String,
    /// Display category, already translated.
    pub category: String,
    /// Already truncated to [`DESCRIPTION_MAX_CHARS`] plus [`ELLIPSIS`].
    pub description: String,
    pub price: Price,
    pub thumbnail: String,
}

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Products;

    fn id(&self) -> i64 {
        self.id.as_i64()
    }
}

/// Map a remote category slug to its display name.
///
/// Unknown categories pass through unchanged.
#[must_use]
pub fn translate_category(category: &str) -> String {
    CATEGORY_NAMES
        .iter()
        .find(|(slug, _)| *slug == category)
        .map_or_else(|| category.to_string(), |(_, name)| (*name).to_string())
}

/// Cut a description to [`DESCRIPTION_MAX_CHARS`] characters plus [`ELLIPSIS`].
#[must_use]
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        let mut cut: String = description.chars().take(DESCRIPTION_MAX_CHARS).collect();
        cut.push_str(ELLIPSIS);
        cut
    } else {
        description.to_string()
    }
}

/// The given thumbnail, or the placeholder when it is blank.
#[must_use]
pub fn thumbnail_or_placeholder(thumbnail: Option<&str>) -> String {
    match thumbnail.map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => PLACEHOLDER_THUMBNAIL.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_known_category() {
        assert_eq!(translate_category("smartphones"), "Celulares");
        assert_eq!(translate_category("home-decoration"), "Decoração");
    }

    #[test]
    fn test_translate_unknown_category_passes_through() {
        assert_eq!(translate_category("motorcycle"), "motorcycle");
        assert_eq!(translate_category("Smartphones"), "Smartphones");
        assert_eq!(translate_category(""), "");
    }

    #[test]
    fn test_truncate_long_description() {
        let input = "x".repeat(71);
        let stored = truncate_description(&input);
        assert_eq!(stored, format!("{}...", "x".repeat(70)));
    }

    #[test]
    fn test_truncate_keeps_exact_length() {
        let input = "y".repeat(70);
        assert_eq!(truncate_description(&input), input);
    }

    #[test]
    fn test_truncate_counts_characters() {
        let input = "é".repeat(71);
        let stored = truncate_description(&input);
        assert_eq!(stored.chars().count(), 73);
        assert!(stored.ends_with("é..."));
    }

    #[test]
    fn test_thumbnail_placeholder() {
        assert_eq!(thumbnail_or_placeholder(None), PLACEHOLDER_THUMBNAIL);
        assert_eq!(thumbnail_or_placeholder(Some("  ")), PLACEHOLDER_THUMBNAIL);
        assert_eq!(
            thumbnail_or_placeholder(Some("https://cdn.example.com/p.png")),
            "https://cdn.example.com/p.png"
        );
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let product = Product {
            id: ProductId::new(1),
            title: "iPhone 9".to_string(),
            brand: "Apple".to_string(),
            category: "Celulares".to_string(),
            description: "An apple mobile".to_string(),
            price: Price::parse("549").unwrap(),
            thumbnail: PLACEHOLDER_THUMBNAIL.to_string(),
        };
        let json = serde_json::to_string(&product).unwrap();
        let parsed: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, product);
    }
}
