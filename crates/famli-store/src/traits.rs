//! Store collaborator traits.
//!
//! Each trait covers one entity family. Services take an `Arc<dyn Store>`,
//! which bundles all of them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use famli_core::result::AppResult;
use famli_entity::analytics::{AnalyticsEvent, AnalyticsSummary, DailyStat, NewAnalyticsEvent};
use famli_entity::guardian::{CreateGuardian, Guardian};
use famli_entity::item::{BoxItem, CreateBoxItem};
use famli_entity::settings::Settings;
use famli_entity::share::{CreateShareLink, ShareLink, ShareLinkAccess};
use famli_entity::user::{CreateUser, SocialProfile, User};

/// Account persistence.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Create a user. Fails with `Conflict` when the email is taken.
    async fn create_user(&self, data: CreateUser) -> AppResult<User>;

    /// Find a user by email (case-insensitive).
    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by id.
    async fn get_user_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Upsert the account behind a verified social identity.
    ///
    /// Keyed by `(provider, subject_id)`. An unknown identity whose email
    /// belongs to an existing account is linked to that account.
    async fn create_or_update_social_user(&self, profile: &SocialProfile) -> AppResult<User>;

    /// Stamp a successful login.
    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;
}

/// Guardian persistence, always scoped to the owning user.
#[async_trait]
pub trait GuardianStore: Send + Sync + 'static {
    /// List a user's guardians, oldest first.
    async fn list_guardians(&self, user_id: Uuid) -> AppResult<Vec<Guardian>>;

    /// Find one of a user's guardians.
    async fn get_guardian(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Guardian>>;

    /// Add a guardian.
    async fn add_guardian(&self, data: CreateGuardian) -> AppResult<Guardian>;

    /// Delete one of a user's guardians. Returns `true` if deleted.
    async fn delete_guardian(&self, user_id: Uuid, id: Uuid) -> AppResult<bool>;
}

/// Box item persistence, always scoped to the owning user.
#[async_trait]
pub trait ItemStore: Send + Sync + 'static {
    /// List a user's items, oldest first.
    async fn get_box_items(&self, user_id: Uuid) -> AppResult<Vec<BoxItem>>;

    /// Find one of a user's items.
    async fn get_box_item(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<BoxItem>>;

    /// Create an item.
    async fn create_box_item(&self, data: CreateBoxItem) -> AppResult<BoxItem>;

    /// Replace an existing item. Fails with `NotFound` if it does not exist.
    async fn update_box_item(&self, item: &BoxItem) -> AppResult<BoxItem>;

    /// Delete one of a user's items. Returns `true` if deleted.
    async fn delete_box_item(&self, user_id: Uuid, id: Uuid) -> AppResult<bool>;
}

/// Share link and access-audit persistence.
#[async_trait]
pub trait ShareLinkStore: Send + Sync + 'static {
    /// Persist a new link. Fails with `Conflict` on a token collision.
    async fn create_share_link(&self, data: CreateShareLink) -> AppResult<ShareLink>;

    /// List a user's links, newest first.
    async fn get_share_links_by_user(&self, user_id: Uuid) -> AppResult<Vec<ShareLink>>;

    /// Find one of a user's links.
    async fn get_share_link(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<ShareLink>>;

    /// Find a link by its public token.
    async fn get_share_link_by_token(&self, token: &str) -> AppResult<Option<ShareLink>>;

    /// Hard-delete one of a user's links together with its access records.
    async fn delete_share_link(&self, user_id: Uuid, id: Uuid) -> AppResult<bool>;

    /// Atomically consume one use of a link.
    ///
    /// The check (`is_usable_at(now)`) and the increment happen under the same
    /// lock. Returns `false`, changing nothing, when the link is missing or
    /// no longer usable.
    async fn increment_share_link_usage(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool>;

    /// Append an access record.
    async fn record_share_link_access(&self, access: ShareLinkAccess) -> AppResult<()>;

    /// Access records of a link, oldest first.
    async fn get_share_link_accesses(&self, share_link_id: Uuid)
    -> AppResult<Vec<ShareLinkAccess>>;
}

/// Per-user settings persistence.
#[async_trait]
pub trait SettingsStore: Send + Sync + 'static {
    /// Stored settings, if the user ever saved any.
    async fn get_settings(&self, user_id: Uuid) -> AppResult<Option<Settings>>;

    /// Insert or replace a user's settings.
    async fn update_settings(&self, settings: Settings) -> AppResult<Settings>;
}

/// Analytics event sink and reports.
#[async_trait]
pub trait AnalyticsStore: Send + Sync + 'static {
    /// Record an event.
    async fn track_event(&self, event: NewAnalyticsEvent) -> AppResult<()>;

    /// Totals over all events.
    async fn get_analytics_summary(&self) -> AppResult<AnalyticsSummary>;

    /// Most recent events, newest first.
    async fn get_recent_events(&self, limit: usize) -> AppResult<Vec<AnalyticsEvent>>;

    /// One entry per day for the last `days` days (today included), oldest first.
    async fn get_daily_stats(&self, days: u32) -> AppResult<Vec<DailyStat>>;
}

/// The complete store collaborator.
pub trait Store:
    UserStore + GuardianStore + ItemStore + ShareLinkStore + SettingsStore + AnalyticsStore
{
}

impl<T> Store for T where
    T: UserStore + GuardianStore + ItemStore + ShareLinkStore + SettingsStore + AnalyticsStore
{
}
