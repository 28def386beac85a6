//! Settings service.

use std::sync::Arc;

use tracing::info;

use famli_core::error::AppError;
use famli_core::result::AppResult;
use famli_entity::settings::{Settings, UpdateSettings};
use famli_store::{SettingsStore, Store};

use crate::context::RequestContext;

/// Languages the clients ship translations for.
const SUPPORTED_LANGUAGES: [&str; 3] = ["pt-BR", "en", "es"];

/// Reads and updates a user's settings.
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn Store>,
}

impl SettingsService {
    /// Creates a new settings service.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// The user's settings, or the defaults if never saved.
    pub async fn get_settings(&self, ctx: &RequestContext) -> AppResult<Settings> {
        Ok(self
            .store
            .get_settings(ctx.user_id)
            .await?
            .unwrap_or_else(|| Settings::defaults_for(ctx.user_id)))
    }

    /// Applies a partial update.
    pub async fn update_settings(
        &self,
        ctx: &RequestContext,
        update: UpdateSettings,
    ) -> AppResult<Settings> {
        if let Some(language) = &update.language {
            if !SUPPORTED_LANGUAGES.contains(&language.as_str()) {
                return Err(AppError::validation(format!(
                    "Unsupported language: {language}"
                )));
            }
        }

        let mut settings = self.get_settings(ctx).await?;
        settings.apply(update);

        let saved = self.store.update_settings(settings).await?;
        info!(user_id = %ctx.user_id, "Settings updated");
        Ok(saved)
    }
}
