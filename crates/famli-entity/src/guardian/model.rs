//! Guardian entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A trusted person who may receive a user's legacy information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guardian {
    /// Unique guardian identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Guardian's name.
    pub name: String,
    /// Guardian's email.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Relationship to the owner ("sister", "lawyer", ...).
    pub relationship: Option<String>,
    /// When the guardian was added.
    pub created_at: DateTime<Utc>,
}

/// Data required to add a guardian.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGuardian {
    /// Owning user.
    pub user_id: Uuid,
    /// Guardian's name.
    pub name: String,
    /// Guardian's email.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Relationship to the owner.
    pub relationship: Option<String>,
}

impl Guardian {
    /// Builds a new guardian record from creation data.
    pub fn from_create(data: CreateGuardian) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            name: data.name,
            email: data.email.trim().to_lowercase(),
            phone: data.phone,
            relationship: data.relationship,
            created_at: Utc::now(),
        }
    }
}
