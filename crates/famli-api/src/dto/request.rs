//! Request DTOs with validation.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use famli_entity::item::UpdateBoxItem;
use famli_entity::settings::UpdateSettings;
use famli_entity::share::ShareLinkType;
use famli_service::guardian::AddGuardianRequest;
use famli_service::item::CreateItemRequest;
use famli_service::share::CreateShareLinkRequest;

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Federated login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IdTokenRequest {
    /// Provider ID token. Google Identity Services calls it `credential`.
    #[serde(alias = "credential")]
    #[validate(length(min = 1, max = 8192, message = "id_token is required"))]
    pub id_token: String,
}

/// Add guardian request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGuardianRequest {
    /// Name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Email.
    #[validate(email)]
    pub email: String,
    /// Phone number.
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    /// Relationship.
    #[validate(length(max = 50))]
    pub relationship: Option<String>,
}

impl From<CreateGuardianRequest> for AddGuardianRequest {
    fn from(req: CreateGuardianRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
            relationship: req.relationship,
        }
    }
}

/// Create item request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBoxItemRequest {
    /// Title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Content.
    #[validate(length(max = 100000))]
    pub content: String,
    /// Category.
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    /// Encrypt at rest.
    #[serde(default)]
    pub is_sensitive: bool,
}

impl From<CreateBoxItemRequest> for CreateItemRequest {
    fn from(req: CreateBoxItemRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            category: req.category,
            is_sensitive: req.is_sensitive,
        }
    }
}

/// Update item request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBoxItemRequest {
    /// New title.
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    /// New content.
    #[validate(length(max = 100000))]
    pub content: Option<String>,
    /// New category.
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    /// New sensitivity flag.
    pub is_sensitive: Option<bool>,
}

impl From<UpdateBoxItemRequest> for UpdateBoxItem {
    fn from(req: UpdateBoxItemRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            category: req.category,
            is_sensitive: req.is_sensitive,
        }
    }
}

/// Update settings request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    /// Language tag.
    #[validate(length(min = 2, max = 10))]
    pub language: Option<String>,
    /// Email notification preference.
    pub email_notifications: Option<bool>,
    /// Emergency message; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub emergency_message: Option<Option<String>>,
}

/// Longest emergency message accepted.
pub const MAX_EMERGENCY_MESSAGE: usize = 2000;

impl From<UpdateSettingsRequest> for UpdateSettings {
    fn from(req: UpdateSettingsRequest) -> Self {
        Self {
            language: req.language,
            email_notifications: req.email_notifications,
            emergency_message: req.emergency_message,
        }
    }
}

/// Create share link request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateShareRequest {
    /// Label.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Link type.
    pub link_type: ShareLinkType,
    /// Visible categories (empty = all).
    #[serde(default)]
    pub categories: Vec<String>,
    /// Optional PIN.
    #[validate(length(max = 8))]
    pub pin: Option<String>,
    /// Target guardian.
    pub guardian_id: Option<Uuid>,
    /// Lifetime in days (zero or negative = no expiry).
    #[validate(range(max = 3650))]
    pub expires_in_days: Option<i64>,
    /// Usage cap (0 = unlimited).
    #[validate(range(min = 0))]
    pub max_uses: Option<i32>,
}

impl From<CreateShareRequest> for CreateShareLinkRequest {
    fn from(req: CreateShareRequest) -> Self {
        Self {
            name: req.name,
            link_type: req.link_type,
            categories: req.categories,
            pin: req.pin,
            guardian_id: req.guardian_id,
            expires_in_days: req.expires_in_days,
            max_uses: req.max_uses,
        }
    }
}

/// Share PIN verification body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ShareVerifyRequest {
    /// The PIN.
    #[validate(length(min = 1, max = 8, message = "PIN is required"))]
    pub pin: String,
}

/// Client analytics event.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TrackEventRequest {
    /// Event name.
    #[validate(length(min = 1, max = 64))]
    pub event_type: String,
    /// Frontend path.
    #[validate(length(max = 512))]
    pub path: Option<String>,
    /// Free-form details.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// `?limit=` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentQuery {
    /// Maximum number of events.
    pub limit: Option<usize>,
}

/// `?days=` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyQuery {
    /// Number of days.
    pub days: Option<u32>,
}
