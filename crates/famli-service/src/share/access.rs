//! Public share access: resolves tokens, gates PINs, records accesses.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use famli_auth::password::PasswordHasher;
use famli_core::error::AppError;
use famli_core::result::AppResult;
use famli_entity::analytics::NewAnalyticsEvent;
use famli_entity::share::{ShareLink, ShareLinkAccess, ShareLinkType, SharedView};
use famli_store::{GuardianStore, SettingsStore, ShareLinkStore, Store, UserStore};

use super::link::LinkService;
use super::projection;
use crate::analytics::{AnalyticsService, events};
use crate::context::ClientInfo;
use crate::item::ItemService;

/// Returned instead of content when a link is PIN-gated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinChallenge {
    /// Always `true`.
    pub requires_pin: bool,
    /// Type of the gated link.
    pub link_type: ShareLinkType,
}

/// Outcome of resolving a share token.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ShareResolution {
    /// The PIN must be verified first. Nothing was recorded.
    PinRequired(PinChallenge),
    /// The content, with the access recorded.
    Content(SharedView),
}

/// Handles public share link access.
#[derive(Clone)]
pub struct AccessService {
    store: Arc<dyn Store>,
    hasher: Arc<PasswordHasher>,
    items: ItemService,
    analytics: AnalyticsService,
}

fn link_not_found() -> AppError {
    AppError::not_found("Share link not found")
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(
        store: Arc<dyn Store>,
        hasher: Arc<PasswordHasher>,
        items: ItemService,
        analytics: AnalyticsService,
    ) -> Self {
        Self {
            store,
            hasher,
            items,
            analytics,
        }
    }

    /// Resolves a share token.
    ///
    /// Absent, inactive, expired and exhausted links are all `NotFound`.
    /// A PIN-gated link yields a [`PinChallenge`] and records nothing.
    pub async fn resolve(&self, token: &str, client: &ClientInfo) -> AppResult<ShareResolution> {
        let link = self.usable_link(token).await?;

        if link.requires_pin() {
            return Ok(ShareResolution::PinRequired(PinChallenge {
                requires_pin: true,
                link_type: link.link_type,
            }));
        }

        Ok(ShareResolution::Content(self.grant(&link, client).await?))
    }

    /// Verifies the PIN of a share link and reveals its content.
    ///
    /// A wrong PIN is `Unauthorized` and records nothing. A link without a
    /// PIN accepts any PIN.
    pub async fn verify_pin(
        &self,
        token: &str,
        pin: &str,
        client: &ClientInfo,
    ) -> AppResult<SharedView> {
        let link = self.usable_link(token).await?;

        if let Some(hash) = link.pin_hash.as_deref() {
            if !self.hasher.verify_password(pin, hash)? {
                warn!(share_id = %link.id, ip = %client.ip_address, "Wrong share link PIN");
                return Err(AppError::unauthorized("Invalid PIN"));
            }
        }

        self.grant(&link, client).await
    }

    async fn usable_link(&self, token: &str) -> AppResult<ShareLink> {
        if !LinkService::is_well_formed(token) {
            return Err(link_not_found());
        }

        let link = self
            .store
            .get_share_link_by_token(token)
            .await?
            .ok_or_else(link_not_found)?;

        if !link.is_usable() {
            return Err(link_not_found());
        }

        Ok(link)
    }

    /// Builds the view, then consumes one use and records the access.
    ///
    /// The increment is conditional; losing the race for the last use
    /// is reported as `NotFound`.
    async fn grant(&self, link: &ShareLink, client: &ClientInfo) -> AppResult<SharedView> {
        let owner = self
            .store
            .get_user_by_id(link.user_id)
            .await?
            .ok_or_else(link_not_found)?;

        let items = self.items.items_of(owner.id).await?;

        let guardians = match link.link_type {
            ShareLinkType::Memorial => self.store.list_guardians(owner.id).await?,
            _ => Vec::new(),
        };

        let emergency_message = match link.link_type {
            ShareLinkType::Emergency => self
                .store
                .get_settings(owner.id)
                .await?
                .and_then(|s| s.emergency_message),
            _ => None,
        };

        let view = projection::build_view(link, &owner, items, guardians, emergency_message);

        if !self
            .store
            .increment_share_link_usage(link.id, Utc::now())
            .await?
        {
            return Err(link_not_found());
        }

        self.store
            .record_share_link_access(ShareLinkAccess::new(
                link.id,
                client.ip_address.clone(),
                client.user_agent.clone(),
            ))
            .await?;

        info!(
            share_id = %link.id,
            link_type = %link.link_type,
            items = view.items.len(),
            "Share link accessed"
        );
        self.analytics.track_detached(
            NewAnalyticsEvent::named(events::SHARE_LINK_ACCESSED, None)
                .with_metadata(serde_json::json!({ "link_type": link.link_type })),
        );

        Ok(view)
    }
}
