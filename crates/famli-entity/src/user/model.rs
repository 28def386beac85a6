//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::provider::AuthProvider;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Email address, stored lowercase.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Argon2 password hash. Absent for social-only accounts.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Provider the account was created with.
    pub provider: AuthProvider,
    /// Subject identifier at the provider (for social accounts).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_subject_id: Option<String>,
    /// Profile picture URL.
    pub avatar_url: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Builds a new user record from creation data.
    pub fn from_create(data: CreateUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: data.email.trim().to_lowercase(),
            name: data.name,
            password_hash: data.password_hash,
            provider: data.provider,
            provider_subject_id: data.provider_subject_id,
            avatar_url: data.avatar_url,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Pre-hashed password.
    pub password_hash: Option<String>,
    /// Account provider.
    pub provider: AuthProvider,
    /// Provider subject id.
    pub provider_subject_id: Option<String>,
    /// Profile picture URL.
    pub avatar_url: Option<String>,
}

/// A verified identity returned by a federated provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfile {
    /// The provider that verified the identity.
    pub provider: AuthProvider,
    /// Stable subject identifier at the provider.
    pub subject_id: String,
    /// Verified email address, when the provider shares one.
    pub email: Option<String>,
    /// Display name, when shared.
    pub name: Option<String>,
    /// Picture URL, when shared.
    pub avatar_url: Option<String>,
}
