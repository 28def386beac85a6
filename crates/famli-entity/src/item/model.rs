//! Box item entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single piece of stored legacy content (memory, document, wish, ...).
///
/// When `is_sensitive` is set, `content` holds the encoded ciphertext while
/// at rest and plaintext once decoded by the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxItem {
    /// Unique item identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Short title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Content category, e.g. `documents` or `memories`.
    pub category: String,
    /// Whether `content` is encrypted at rest.
    pub is_sensitive: bool,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

impl BoxItem {
    /// Builds a new item record from creation data.
    pub fn from_create(data: CreateBoxItem) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            title: data.title,
            content: data.content,
            category: data.category,
            is_sensitive: data.is_sensitive,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns whether this item falls within the given category filter.
    ///
    /// An empty filter matches every item.
    pub fn matches_categories(&self, categories: &[String]) -> bool {
        categories.is_empty() || categories.iter().any(|c| c == &self.category)
    }
}

/// Data required to create an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBoxItem {
    /// Owning user.
    pub user_id: Uuid,
    /// Short title.
    pub title: String,
    /// Body text (already encoded when sensitive).
    pub content: String,
    /// Content category.
    pub category: String,
    /// Whether the content is encrypted.
    pub is_sensitive: bool,
}

/// Partial update of an item. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBoxItem {
    /// New title.
    pub title: Option<String>,
    /// New content (plaintext at the service boundary).
    pub content: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New sensitivity flag.
    pub is_sensitive: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(category: &str) -> BoxItem {
        BoxItem::from_create(CreateBoxItem {
            user_id: Uuid::new_v4(),
            title: "t".to_string(),
            content: "c".to_string(),
            category: category.to_string(),
            is_sensitive: false,
        })
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(item("memories").matches_categories(&[]));
    }

    #[test]
    fn test_filter_matches_only_listed_categories() {
        let filter = vec!["documents".to_string()];
        assert!(item("documents").matches_categories(&filter));
        assert!(!item("memories").matches_categories(&filter));
    }
}
