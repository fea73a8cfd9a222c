//! HTML output via askama.

use askama::Template;

use crate::error::Result;

use super::{ItemView, ListView};

/// List fragment template.
#[derive(Template)]
#[template(path = "list.html")]
struct ListTemplate<'a> {
    /// Shown instead of the list when there are no items.
    empty_message: &'a str,
    items: &'a [ItemView],
}

impl ListView {
    /// Render as an HTML fragment. Record fields are escaped.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn to_html(&self) -> Result<String> {
        let empty_message = match self {
            Self::Empty { message } => *message,
            Self::Items(_) => "",
        };

        let html = ListTemplate {
            empty_message,
            items: self.items(),
        }
        .render()?;
        Ok(html)
    }
}
