use serde::{Deserialize, Serialize};

use crate::content::Content;

/// Sentinel category meaning "no category restriction".
pub const CATEGORY_ALL: &str = "all";

/// Catalog query filter.
///
/// Search policy: case-insensitive substring match against the title
/// **or** the description. The wire only restricts by category; the
/// search policy is applied engine-side so it stays consistent across
/// backends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl CatalogFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            search: None,
        }
    }

    pub fn with_search(search: impl Into<String>) -> Self {
        Self {
            category: None,
            search: Some(search.into()),
        }
    }

    /// The category to restrict by, with the `"all"` sentinel and blank
    /// values collapsed to "unrestricted".
    pub fn category_restriction(&self) -> Option<&str> {
        match self.category.as_deref() {
            None | Some(CATEGORY_ALL) | Some("") => None,
            Some(category) => Some(category),
        }
    }

    /// Apply the search term to one title.
    pub fn search_matches(&self, content: &Content) -> bool {
        match self.search.as_deref() {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                content.title.to_lowercase().contains(&term)
                    || content.description.to_lowercase().contains(&term)
            }
        }
    }
}
