//! Catalog records and the traits shared by both entity kinds.

pub mod product;
pub mod user;

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use product::{Product, translate_category, truncate_description};
pub use user::User;

/// The two parallel domains handled by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Users,
    Products,
}

/// Where appended records land in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Front,
    Back,
}

impl EntityKind {
    /// Fixed, versioned namespace key of the snapshot slot.
    #[must_use]
    pub const fn store_key(self) -> &'static str {
        match self {
            Self::Users => "df2_users_v1",
            Self::Products => "df2_products_v1",
        }
    }

    /// Users appear newest-first, products in insertion order.
    #[must_use]
    pub const fn insert_position(self) -> InsertPosition {
        match self {
            Self::Users => InsertPosition::Front,
            Self::Products => InsertPosition::Back,
        }
    }

    /// Placeholder shown instead of an empty list.
    #[must_use]
    pub const fn empty_message(self) -> &'static str {
        match self {
            Self::Users => "Nenhum usuário disponível.",
            Self::Products => "Nenhum produto cadastrado.",
        }
    }

    /// Lower-case plural name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Products => "products",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record that can live in a [`crate::sync::Catalog`].
pub trait Entity: Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned {
    /// Which domain this record belongs to.
    const KIND: EntityKind;

    /// Identifier, unique within the collection.
    fn id(&self) -> i64;
}

/// Hands out identifiers that are unique within one collection.
///
/// Fresh identifiers come from the current time in milliseconds. When that
/// value is already taken, one past the largest identifier is used instead.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    taken: HashSet<i64>,
}

impl IdAllocator {
    /// Create an allocator with no identifiers taken.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an allocator that avoids every identifier in `records`.
    pub fn for_records<'a, E: Entity + 'a>(records: impl IntoIterator<Item = &'a E>) -> Self {
        Self {
            taken: records.into_iter().map(Entity::id).collect(),
        }
    }

    /// Reserve `id` if it is still free. Returns `false` on a collision.
    pub fn claim(&mut self, id: i64) -> bool {
        self.taken.insert(id)
    }

    /// Keep `candidate` when it is present and free, otherwise allocate.
    pub fn claim_or_allocate(&mut self, candidate: Option<i64>) -> i64 {
        match candidate {
            Some(id) if self.claim(id) => id,
            _ => self.allocate(),
        }
    }

    /// Allocate a fresh identifier from the current timestamp.
    pub fn allocate(&mut self) -> i64 {
        self.allocate_at(chrono::Utc::now().timestamp_millis())
    }

    fn allocate_at(&mut self, now_millis: i64) -> i64 {
        let id = if self.taken.contains(&now_millis) {
            self.taken
                .iter()
                .copied()
                .max()
                .map_or(now_millis, |max| max.saturating_add(1))
        } else {
            now_millis
        };
        self.taken.insert(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_keys_are_disjoint() {
        assert_ne!(
            EntityKind::Users.store_key(),
            EntityKind::Products.store_key()
        );
    }

    #[test]
    fn test_insert_positions() {
        assert_eq!(EntityKind::Users.insert_position(), InsertPosition::Front);
        assert_eq!(EntityKind::Products.insert_position(), InsertPosition::Back);
    }

    #[test]
    fn test_allocate_uses_timestamp_when_free() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate_at(1_000), 1_000);
    }

    #[test]
    fn test_allocate_bumps_past_largest_on_collision() {
        let mut ids = IdAllocator::new();
        assert!(ids.claim(1_000));
        assert!(ids.claim(5_000));
        assert_eq!(ids.allocate_at(1_000), 5_001);
        assert_eq!(ids.allocate_at(1_000), 5_002);
    }

    #[test]
    fn test_claim_or_allocate_replaces_duplicates() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.claim_or_allocate(Some(3)), 3);
        let replacement = ids.claim_or_allocate(Some(3));
        assert_ne!(replacement, 3);
        let synthetic = ids.claim_or_allocate(None);
        assert_ne!(synthetic, 3);
        assert_ne!(synthetic, replacement);
    }
}
