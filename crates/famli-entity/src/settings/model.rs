//! Settings entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Owning user.
    pub user_id: Uuid,
    /// UI language tag, e.g. `pt-BR`.
    pub language: String,
    /// Whether reminder emails are sent.
    pub email_notifications: bool,
    /// Personal note shown to guardians in an emergency.
    pub emergency_message: Option<String>,
    /// When the settings were last changed.
    pub updated_at: DateTime<Utc>,
}

impl Settings {
    /// Default settings for a user who never saved any.
    pub fn defaults_for(user_id: Uuid) -> Self {
        Self {
            user_id,
            language: "pt-BR".to_string(),
            email_notifications: true,
            emergency_message: None,
            updated_at: Utc::now(),
        }
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, update: UpdateSettings) {
        if let Some(language) = update.language {
            self.language = language;
        }
        if let Some(email_notifications) = update.email_notifications {
            self.email_notifications = email_notifications;
        }
        if let Some(emergency_message) = update.emergency_message {
            self.emergency_message = emergency_message;
        }
        self.updated_at = Utc::now();
    }
}

/// Partial settings update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSettings {
    /// New language.
    pub language: Option<String>,
    /// New notification preference.
    pub email_notifications: Option<bool>,
    /// New emergency message (`Some(None)` clears it).
    pub emergency_message: Option<Option<String>>,
}
