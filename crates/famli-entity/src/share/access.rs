//! Share link access audit record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One successful resolution of a share link. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLinkAccess {
    /// Unique record identifier.
    pub id: Uuid,
    /// The link that was accessed.
    pub share_link_id: Uuid,
    /// Client IP address.
    pub ip_address: String,
    /// Client User-Agent.
    pub user_agent: Option<String>,
    /// When the access happened.
    pub accessed_at: DateTime<Utc>,
}

impl ShareLinkAccess {
    /// Creates a new access record stamped with the current time.
    pub fn new(share_link_id: Uuid, ip_address: String, user_agent: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            share_link_id,
            ip_address,
            user_agent,
            accessed_at: Utc::now(),
        }
    }
}
