//! In-memory store implementation using dashmap.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use famli_core::error::AppError;
use famli_core::result::AppResult;
use famli_entity::analytics::{AnalyticsEvent, AnalyticsSummary, DailyStat, NewAnalyticsEvent};
use famli_entity::guardian::{CreateGuardian, Guardian};
use famli_entity::item::{BoxItem, CreateBoxItem};
use famli_entity::settings::Settings;
use famli_entity::share::{CreateShareLink, ShareLink, ShareLinkAccess};
use famli_entity::user::{AuthProvider, CreateUser, SocialProfile, User};

use crate::traits::{
    AnalyticsStore, GuardianStore, ItemStore, SettingsStore, ShareLinkStore, UserStore,
};

/// Oldest analytics events are dropped beyond this many.
const MAX_EVENTS: usize = 100_000;

/// Process-local store.
///
/// Each map is sharded and locked per key, so single-record
/// read-modify-write operations are atomic. Secondary indexes (email,
/// social identity, share token) are claimed through `entry()` before the
/// primary record is written, which keeps them unique under concurrency.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Users by id.
    users: Arc<DashMap<Uuid, User>>,
    /// Lowercased email to user id.
    emails: Arc<DashMap<String, Uuid>>,
    /// `(provider, subject)` to user id.
    identities: Arc<DashMap<(AuthProvider, String), Uuid>>,
    /// Guardians by id.
    guardians: Arc<DashMap<Uuid, Guardian>>,
    /// Box items by id.
    items: Arc<DashMap<Uuid, BoxItem>>,
    /// Share links by id.
    links: Arc<DashMap<Uuid, ShareLink>>,
    /// Share token to link id.
    tokens: Arc<DashMap<String, Uuid>>,
    /// Access records per link id.
    accesses: Arc<DashMap<Uuid, Vec<ShareLinkAccess>>>,
    /// Settings by user id.
    settings: Arc<DashMap<Uuid, Settings>>,
    /// Analytics events, oldest first.
    events: Arc<RwLock<Vec<AnalyticsEvent>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, data: CreateUser) -> AppResult<User> {
        let user = User::from_create(data);

        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::conflict("An account with this email already exists"));
            }
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }

        if let Some(subject) = &user.provider_subject_id {
            self.identities
                .insert((user.provider, subject.clone()), user.id);
        }
        self.users.insert(user.id, user.clone());

        debug!(user_id = %user.id, provider = %user.provider, "User created");
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let id = match self.emails.get(&Self::normalize_email(email)) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn get_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn create_or_update_social_user(&self, profile: &SocialProfile) -> AppResult<User> {
        let key = (profile.provider, profile.subject_id.clone());

        let known = self.identities.get(&key).map(|id| *id);
        let linked = match known {
            Some(id) => Some(id),
            None => match &profile.email {
                Some(email) => {
                    let existing = self.emails.get(&Self::normalize_email(email)).map(|id| *id);
                    if let Some(id) = existing {
                        self.identities.insert(key.clone(), id);
                    }
                    existing
                }
                None => None,
            },
        };

        if let Some(id) = linked {
            let mut user = self
                .users
                .get_mut(&id)
                .ok_or_else(|| AppError::internal("Social identity points at a missing user"))?;
            if let Some(name) = profile.name.as_ref().filter(|n| !n.trim().is_empty()) {
                user.name = name.clone();
            }
            if profile.avatar_url.is_some() {
                user.avatar_url = profile.avatar_url.clone();
            }
            if user.provider_subject_id.is_none() && user.provider == profile.provider {
                user.provider_subject_id = Some(profile.subject_id.clone());
            }
            user.updated_at = Utc::now();
            return Ok(user.clone());
        }

        let email = profile.email.clone().ok_or_else(|| {
            AppError::validation("The identity provider did not share an email address")
        })?;
        let name = profile
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        self.create_user(CreateUser {
            email,
            name,
            password_hash: None,
            provider: profile.provider,
            provider_subject_id: Some(profile.subject_id.clone()),
            avatar_url: profile.avatar_url.clone(),
        })
        .await
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }
}

#[async_trait]
impl GuardianStore for MemoryStore {
    async fn list_guardians(&self, user_id: Uuid) -> AppResult<Vec<Guardian>> {
        let mut guardians: Vec<Guardian> = self
            .guardians
            .iter()
            .filter(|g| g.user_id == user_id)
            .map(|g| g.clone())
            .collect();
        guardians.sort_by_key(|g| g.created_at);
        Ok(guardians)
    }

    async fn get_guardian(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Guardian>> {
        Ok(self
            .guardians
            .get(&id)
            .filter(|g| g.user_id == user_id)
            .map(|g| g.clone()))
    }

    async fn add_guardian(&self, data: CreateGuardian) -> AppResult<Guardian> {
        let guardian = Guardian::from_create(data);
        self.guardians.insert(guardian.id, guardian.clone());
        Ok(guardian)
    }

    async fn delete_guardian(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        Ok(self
            .guardians
            .remove_if(&id, |_, g| g.user_id == user_id)
            .is_some())
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn get_box_items(&self, user_id: Uuid) -> AppResult<Vec<BoxItem>> {
        let mut items: Vec<BoxItem> = self
            .items
            .iter()
            .filter(|i| i.user_id == user_id)
            .map(|i| i.clone())
            .collect();
        items.sort_by_key(|i| i.created_at);
        Ok(items)
    }

    async fn get_box_item(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<BoxItem>> {
        Ok(self
            .items
            .get(&id)
            .filter(|i| i.user_id == user_id)
            .map(|i| i.clone()))
    }

    async fn create_box_item(&self, data: CreateBoxItem) -> AppResult<BoxItem> {
        let item = BoxItem::from_create(data);
        self.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_box_item(&self, item: &BoxItem) -> AppResult<BoxItem> {
        let mut stored = self
            .items
            .get_mut(&item.id)
            .filter(|i| i.user_id == item.user_id)
            .ok_or_else(|| AppError::not_found("Item not found"))?;
        *stored = item.clone();
        Ok(stored.clone())
    }

    async fn delete_box_item(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        Ok(self
            .items
            .remove_if(&id, |_, i| i.user_id == user_id)
            .is_some())
    }
}

#[async_trait]
impl ShareLinkStore for MemoryStore {
    async fn create_share_link(&self, data: CreateShareLink) -> AppResult<ShareLink> {
        let link = ShareLink::from_create(data);

        match self.tokens.entry(link.token.clone()) {
            Entry::Occupied(_) => return Err(AppError::conflict("Share token collision")),
            Entry::Vacant(slot) => {
                slot.insert(link.id);
            }
        }
        self.links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn get_share_links_by_user(&self, user_id: Uuid) -> AppResult<Vec<ShareLink>> {
        let mut links: Vec<ShareLink> = self
            .links
            .iter()
            .filter(|l| l.user_id == user_id)
            .map(|l| l.clone())
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(links)
    }

    async fn get_share_link(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<ShareLink>> {
        Ok(self
            .links
            .get(&id)
            .filter(|l| l.user_id == user_id)
            .map(|l| l.clone()))
    }

    async fn get_share_link_by_token(&self, token: &str) -> AppResult<Option<ShareLink>> {
        let id = match self.tokens.get(token) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.links.get(&id).map(|l| l.clone()))
    }

    async fn delete_share_link(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let removed = self.links.remove_if(&id, |_, l| l.user_id == user_id);
        match removed {
            Some((_, link)) => {
                self.tokens.remove(&link.token);
                self.accesses.remove(&link.id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn increment_share_link_usage(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let Some(mut link) = self.links.get_mut(&id) else {
            return Ok(false);
        };
        if !link.is_usable_at(now) {
            return Ok(false);
        }
        link.usage_count += 1;
        link.last_accessed_at = Some(now);
        Ok(true)
    }

    async fn record_share_link_access(&self, access: ShareLinkAccess) -> AppResult<()> {
        self.accesses
            .entry(access.share_link_id)
            .or_default()
            .push(access);
        Ok(())
    }

    async fn get_share_link_accesses(
        &self,
        share_link_id: Uuid,
    ) -> AppResult<Vec<ShareLinkAccess>> {
        Ok(self
            .accesses
            .get(&share_link_id)
            .map(|a| a.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get_settings(&self, user_id: Uuid) -> AppResult<Option<Settings>> {
        Ok(self.settings.get(&user_id).map(|s| s.clone()))
    }

    async fn update_settings(&self, settings: Settings) -> AppResult<Settings> {
        self.settings.insert(settings.user_id, settings.clone());
        Ok(settings)
    }
}

#[async_trait]
impl AnalyticsStore for MemoryStore {
    async fn track_event(&self, event: NewAnalyticsEvent) -> AppResult<()> {
        let mut events = self.events.write().await;
        events.push(AnalyticsEvent::from_new(event));
        if events.len() > MAX_EVENTS {
            let overflow = events.len() - MAX_EVENTS;
            events.drain(..overflow);
        }
        Ok(())
    }

    async fn get_analytics_summary(&self) -> AppResult<AnalyticsSummary> {
        let events = self.events.read().await;
        let mut summary = AnalyticsSummary {
            total_events: events.len() as u64,
            ..Default::default()
        };
        let mut users = HashSet::new();
        for event in events.iter() {
            *summary
                .events_by_type
                .entry(event.event_type.clone())
                .or_insert(0) += 1;
            if let Some(user_id) = event.user_id {
                users.insert(user_id);
            }
        }
        summary.unique_users = users.len() as u64;
        Ok(summary)
    }

    async fn get_recent_events(&self, limit: usize) -> AppResult<Vec<AnalyticsEvent>> {
        let events = self.events.read().await;
        Ok(events.iter().rev().take(limit).cloned().collect())
    }

    async fn get_daily_stats(&self, days: u32) -> AppResult<Vec<DailyStat>> {
        if days == 0 {
            return Ok(Vec::new());
        }
        let today = Utc::now().date_naive();
        let first = today - Duration::days(i64::from(days) - 1);

        let mut buckets: BTreeMap<_, (u64, HashSet<Uuid>)> = BTreeMap::new();
        let mut day = first;
        while day <= today {
            buckets.insert(day, (0, HashSet::new()));
            day += Duration::days(1);
        }

        let events = self.events.read().await;
        for event in events.iter() {
            if let Some((count, users)) = buckets.get_mut(&event.created_at.date_naive()) {
                *count += 1;
                if let Some(user_id) = event.user_id {
                    users.insert(user_id);
                }
            }
        }

        Ok(buckets
            .into_iter()
            .map(|(date, (events, users))| DailyStat {
                date,
                events,
                unique_users: users.len() as u64,
            })
            .collect())
    }
}
