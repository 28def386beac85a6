//! Share link CRUD service.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use famli_auth::password::PasswordHasher;
use famli_core::error::{AppError, ErrorKind};
use famli_core::result::AppResult;
use famli_entity::analytics::NewAnalyticsEvent;
use famli_entity::share::{CreateShareLink, ShareLink, ShareLinkAccess, ShareLinkType};
use famli_store::{ShareLinkStore, Store};

use super::link::LinkService;
use crate::analytics::{AnalyticsService, events};
use crate::context::RequestContext;
use crate::guardian::GuardianService;

/// Attempts at finding an unused token before giving up.
const TOKEN_ATTEMPTS: usize = 3;

/// Longest allowed lifetime, in days.
const MAX_EXPIRY_DAYS: i64 = 3650;

/// Request to create a share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareLinkRequest {
    /// Owner-facing label.
    pub name: String,
    /// Link type.
    pub link_type: ShareLinkType,
    /// Visible categories. Empty means all.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Access PIN (4 to 8 digits).
    pub pin: Option<String>,
    /// Guardian the link is meant for.
    pub guardian_id: Option<Uuid>,
    /// Lifetime in days. Absent or zero means no expiry.
    pub expires_in_days: Option<i64>,
    /// Usage cap. Absent or zero means unlimited.
    pub max_uses: Option<i32>,
}

/// A share link as shown to its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLinkSummary {
    /// Link id.
    pub id: Uuid,
    /// Owner-facing label.
    pub name: String,
    /// Public token.
    pub token: String,
    /// Public URL.
    pub url: String,
    /// Link type.
    pub link_type: ShareLinkType,
    /// Visible categories.
    pub categories: Vec<String>,
    /// Target guardian.
    pub guardian_id: Option<Uuid>,
    /// Whether a PIN is required.
    pub has_pin: bool,
    /// Expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// Usage cap (0 = unlimited).
    pub max_uses: i32,
    /// Successful accesses so far.
    pub usage_count: i32,
    /// Kill switch.
    pub is_active: bool,
    /// Whether the link currently works.
    pub is_usable: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last successful access.
    pub last_accessed_at: Option<DateTime<Utc>>,
}

/// Manages share link creation, listing, and deletion for owners.
#[derive(Clone)]
pub struct ShareService {
    store: Arc<dyn Store>,
    link_service: Arc<LinkService>,
    hasher: Arc<PasswordHasher>,
    guardians: GuardianService,
    analytics: AnalyticsService,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        store: Arc<dyn Store>,
        link_service: Arc<LinkService>,
        hasher: Arc<PasswordHasher>,
        analytics: AnalyticsService,
    ) -> Self {
        Self {
            guardians: GuardianService::new(store.clone()),
            store,
            link_service,
            hasher,
            analytics,
        }
    }

    /// Creates a share link.
    pub async fn create_link(
        &self,
        ctx: &RequestContext,
        req: CreateShareLinkRequest,
    ) -> AppResult<ShareLinkSummary> {
        let name = req.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Link name is required"));
        }

        let max_uses = req.max_uses.unwrap_or(0);
        if max_uses < 0 {
            return Err(AppError::validation("max_uses cannot be negative"));
        }

        let expires_at = match req.expires_in_days {
            Some(days) if days > MAX_EXPIRY_DAYS => {
                return Err(AppError::validation(format!(
                    "expires_in_days cannot exceed {MAX_EXPIRY_DAYS}"
                )));
            }
            Some(days) if days > 0 => Some(Utc::now() + Duration::days(days)),
            _ => None,
        };

        if let Some(guardian_id) = req.guardian_id {
            self.guardians.ensure_owned(ctx.user_id, guardian_id).await?;
        }

        let pin_hash = match req.pin.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            Some(pin) => {
                validate_pin(pin)?;
                Some(self.hasher.hash_password(pin)?)
            }
            None => None,
        };

        let mut draft = CreateShareLink {
            user_id: ctx.user_id,
            guardian_id: req.guardian_id,
            name,
            token: String::new(),
            link_type: req.link_type,
            categories: normalize_categories(req.categories),
            pin_hash,
            expires_at,
            max_uses,
        };

        let link = self.insert_with_fresh_token(&mut draft).await?;

        info!(
            user_id = %ctx.user_id,
            share_id = %link.id,
            link_type = %link.link_type,
            "Share link created"
        );
        self.analytics.track_detached(
            NewAnalyticsEvent::named(events::SHARE_LINK_CREATED, Some(ctx.user_id)).with_metadata(
                serde_json::json!({ "link_type": link.link_type }),
            ),
        );

        Ok(self.summarize(link))
    }

    /// Lists the current user's links, newest first.
    pub async fn list_links(&self, ctx: &RequestContext) -> AppResult<Vec<ShareLinkSummary>> {
        Ok(self
            .store
            .get_share_links_by_user(ctx.user_id)
            .await?
            .into_iter()
            .map(|link| self.summarize(link))
            .collect())
    }

    /// Hard-deletes one of the current user's links.
    pub async fn delete_link(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        if !self.store.delete_share_link(ctx.user_id, id).await? {
            return Err(AppError::not_found("Share link not found"));
        }
        info!(user_id = %ctx.user_id, share_id = %id, "Share link deleted");
        Ok(())
    }

    /// Access history of one of the current user's links, oldest first.
    pub async fn list_accesses(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> AppResult<Vec<ShareLinkAccess>> {
        let link = self
            .store
            .get_share_link(ctx.user_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Share link not found"))?;

        self.store.get_share_link_accesses(link.id).await
    }

    async fn insert_with_fresh_token(&self, draft: &mut CreateShareLink) -> AppResult<ShareLink> {
        for attempt in 1..=TOKEN_ATTEMPTS {
            draft.token = self.link_service.generate_token();
            match self.store.create_share_link(draft.clone()).await {
                Ok(link) => return Ok(link),
                Err(e) if e.is(ErrorKind::Conflict) => {
                    warn!(attempt, "Share token collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }
        Err(AppError::internal("Could not allocate a unique share token"))
    }

    fn summarize(&self, link: ShareLink) -> ShareLinkSummary {
        ShareLinkSummary {
            url: self.link_service.url_for(&link.token),
            has_pin: link.requires_pin(),
            is_usable: link.is_usable(),
            id: link.id,
            name: link.name,
            token: link.token,
            link_type: link.link_type,
            categories: link.categories,
            guardian_id: link.guardian_id,
            expires_at: link.expires_at,
            max_uses: link.max_uses,
            usage_count: link.usage_count,
            is_active: link.is_active,
            created_at: link.created_at,
            last_accessed_at: link.last_accessed_at,
        }
    }
}

fn validate_pin(pin: &str) -> AppResult<()> {
    if !(4..=8).contains(&pin.len()) || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::validation("PIN must be 4 to 8 digits"));
    }
    Ok(())
}

fn normalize_categories(categories: Vec<String>) -> Vec<String> {
    categories
        .into_iter()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
