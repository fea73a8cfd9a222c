//! Display projection of a collection.
//!
//! [`render`] is a pure function of the records: it never reads the store
//! and never fails. The resulting [`ListView`] prints as plain text through
//! `Display` and as HTML through [`ListView::to_html`].

mod html;

use std::fmt;

use crate::models::{Entity, Product, User};

/// Image shown for users without one.
pub const USER_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/80x80?text=User";

/// Email line shown for users without one.
const MISSING_EMAIL: &str = "sem email";

/// Separator between fields on a meta line.
const META_SEPARATOR: &str = " • ";

/// Action offered on a rendered list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    /// Delete the record at this position.
    Remove,
    /// Seed a new record from this one.
    UseAsTemplate,
}

impl ItemAction {
    /// Machine-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remove => "remove",
            Self::UseAsTemplate => "use-as-template",
        }
    }

    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Remove => "Remover",
            Self::UseAsTemplate => "Adicionar",
        }
    }
}

/// One rendered record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    /// Current index in the collection; actions are addressed by it.
    pub position: usize,
    pub id: i64,
    pub image: String,
    pub heading: String,
    pub meta: String,
    /// Formatted as `R$ 1.234,56`.
    pub price: Option<String>,
    pub detail: String,
    pub actions: Vec<ItemAction>,
}

impl ItemView {
    /// The price, or the empty string.
    #[must_use]
    pub fn price_label(&self) -> &str {
        self.price.as_deref().unwrap_or_default()
    }
}

/// A rendered collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Empty { message: &'static str },
    Items(Vec<ItemView>),
}

impl ListView {
    /// Items in render order; empty for [`ListView::Empty`].
    #[must_use]
    pub fn items(&self) -> &[ItemView] {
        match self {
            Self::Empty { .. } => &[],
            Self::Items(items) => items,
        }
    }
}

/// Records that know how to present themselves in a list.
pub trait ToItemView: Entity {
    fn to_item_view(&self, position: usize) -> ItemView;
}

impl ToItemView for User {
    fn to_item_view(&self, position: usize) -> ItemView {
        let email = if self.email.is_empty() {
            MISSING_EMAIL
        } else {
            self.email.as_str()
        };
        let age = self.age.map(|years| format!("{years} anos")).unwrap_or_default();
        let image = if self.image.is_empty() {
            USER_PLACEHOLDER_IMAGE.to_string()
        } else {
            self.image.clone()
        };

        ItemView {
            position,
            id: self.id(),
            image,
            heading: self.full_name(),
            meta: format!("{email}{META_SEPARATOR}{age}"),
            price: None,
            detail: String::new(),
            actions: vec![ItemAction::Remove],
        }
    }
}

impl ToItemView for Product {
    fn to_item_view(&self, position: usize) -> ItemView {
        ItemView {
            position,
            id: self.id(),
            image: self.thumbnail.clone(),
            heading: self.title.clone(),
            meta: format!("{}{META_SEPARATOR}{}", self.brand, self.category),
            price: Some(self.price.display_brl()),
            detail: self.description.clone(),
            actions: vec![ItemAction::UseAsTemplate, ItemAction::Remove],
        }
    }
}

/// Project `records` for display.
#[must_use]
pub fn render<E: ToItemView>(records: &[E]) -> ListView {
    if records.is_empty() {
        return ListView::Empty {
            message: E::KIND.empty_message(),
        };
    }

    ListView::Items(
        records
            .iter()
            .enumerate()
            .map(|(position, record)| record.to_item_view(position))
            .collect(),
    )
}

impl fmt::Display for ListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = match self {
            Self::Empty { message } => return writeln!(f, "{message}"),
            Self::Items(items) => items,
        };

        for item in items {
            writeln!(f, "[{}] {}", item.position, item.heading)?;
            writeln!(f, "    {}", item.meta)?;
            if let Some(price) = &item.price {
                writeln!(f, "    {price}")?;
            }
            if !item.detail.is_empty() {
                writeln!(f, "    {}", item.detail)?;
            }
            let actions: Vec<&str> = item.actions.iter().map(|a| a.label()).collect();
            writeln!(f, "    id {} | {}", item.id, actions.join(", "))?;
        }
        Ok(())
    }
}
