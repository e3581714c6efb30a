//! The content item a request renders, saves, or deletes.

use serde::{Deserialize, Serialize};

/// A content item managed by the host.
///
/// Only the template name matters to engine dispatch; the remaining fields are
/// handed to engines as the `page` template variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// The host's identifier for this item.
    pub id: u64,
    /// URL-safe name of the item.
    pub name: String,
    /// Human-readable title.
    pub title: String,
    /// Name of the content template this item uses (e.g. "contact").
    pub template: String,
}

impl Page {
    /// Creates a page whose title equals its name.
    pub fn new(id: u64, name: impl Into<String>, template: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            title: name.clone(),
            name,
            template: template.into(),
        }
    }

    /// Sets the page title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Returns `true` if this page uses the given template.
    pub fn uses_template(&self, template: &str) -> bool {
        self.template == template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_title_to_name() {
        let page = Page::new(7, "contact-us", "contact");
        assert_eq!(page.title, "contact-us");
        assert!(page.uses_template("contact"));
        assert!(!page.uses_template("admin"));
    }

    #[test]
    fn test_serializes_for_templates() {
        let page = Page::new(1, "home", "home").with_title("Welcome");
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["title"], "Welcome");
        assert_eq!(json["template"], "home");
    }
}
