//! Public projection of a user's content through a share link.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::ShareLinkType;

/// What a share link recipient sees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedView {
    /// Label of the link.
    pub link_name: String,
    /// Link type.
    pub link_type: ShareLinkType,
    /// Owner's display name.
    pub owner_name: String,
    /// Fixed notice shown above emergency and memorial views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Visible items (sensitive content already decrypted).
    pub items: Vec<SharedItem>,
    /// Owner's guardians (memorial links only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardians: Option<Vec<SharedGuardian>>,
    /// Owner's email (memorial links only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
}

/// An item as exposed through a share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedItem {
    /// Title.
    pub title: String,
    /// Plaintext content.
    pub content: String,
    /// Category.
    pub category: String,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
}

/// A guardian as exposed through a memorial link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedGuardian {
    /// Name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Relationship to the owner.
    pub relationship: Option<String>,
}
