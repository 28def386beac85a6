//! Share link entity model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Governs which extra content a share link reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareLinkType {
    /// Only the selected items.
    Normal,
    /// Selected items behind an emergency notice.
    Emergency,
    /// Selected items plus guardians and the owner's email, behind a memorial notice.
    Memorial,
}

impl fmt::Display for ShareLinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Emergency => write!(f, "emergency"),
            Self::Memorial => write!(f, "memorial"),
        }
    }
}

/// A capability granting public, read-only access to part of a user's box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLink {
    /// Unique share link identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Guardian the link was created for, if any.
    pub guardian_id: Option<Uuid>,
    /// Owner-facing label.
    pub name: String,
    /// Opaque public lookup token.
    pub token: String,
    /// Link type.
    pub link_type: ShareLinkType,
    /// Visible categories. Empty means all categories.
    pub categories: Vec<String>,
    /// Argon2 hash of the access PIN.
    #[serde(skip_serializing)]
    pub pin_hash: Option<String>,
    /// When the link stops working.
    pub expires_at: Option<DateTime<Utc>>,
    /// Maximum number of successful accesses. 0 means unlimited.
    pub max_uses: i32,
    /// Number of successful accesses so far.
    pub usage_count: i32,
    /// Kill switch.
    pub is_active: bool,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
    /// Last successful access.
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl ShareLink {
    /// Builds a new link record from creation data.
    pub fn from_create(data: CreateShareLink) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            guardian_id: data.guardian_id,
            name: data.name,
            token: data.token,
            link_type: data.link_type,
            categories: data.categories,
            pin_hash: data.pin_hash,
            expires_at: data.expires_at,
            max_uses: data.max_uses,
            usage_count: 0,
            is_active: true,
            created_at: Utc::now(),
            last_accessed_at: None,
        }
    }

    /// Whether a PIN must be supplied before content is revealed.
    pub fn requires_pin(&self) -> bool {
        self.pin_hash.is_some()
    }

    /// Whether the link has passed its expiry at the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if now >= expires_at)
    }

    /// Whether the usage cap has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.max_uses > 0 && self.usage_count >= self.max_uses
    }

    /// Whether the link may be used at the given instant.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now) && !self.is_exhausted()
    }

    /// Whether the link may be used right now.
    pub fn is_usable(&self) -> bool {
        self.is_usable_at(Utc::now())
    }
}

/// Data required to create a new share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareLink {
    /// Owning user.
    pub user_id: Uuid,
    /// Target guardian.
    pub guardian_id: Option<Uuid>,
    /// Owner-facing label.
    pub name: String,
    /// Generated token.
    pub token: String,
    /// Link type.
    pub link_type: ShareLinkType,
    /// Visible categories.
    pub categories: Vec<String>,
    /// PIN hash, if PIN-gated.
    pub pin_hash: Option<String>,
    /// Expiry (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// Usage cap (0 = unlimited).
    pub max_uses: i32,
}
