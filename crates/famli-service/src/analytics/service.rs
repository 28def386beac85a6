//! Analytics service.

use std::sync::Arc;

use tracing::{debug, warn};

use famli_core::config::AnalyticsConfig;
use famli_core::error::AppError;
use famli_core::result::AppResult;
use famli_entity::analytics::{AnalyticsEvent, AnalyticsSummary, DailyStat, NewAnalyticsEvent};
use famli_store::{AnalyticsStore, Store};

use crate::context::RequestContext;

/// Event types emitted by the backend itself.
pub mod events {
    /// A user registered.
    pub const USER_REGISTERED: &str = "user_registered";
    /// A user logged in.
    pub const USER_LOGIN: &str = "user_login";
    /// A share link revealed its content.
    pub const SHARE_LINK_ACCESSED: &str = "share_link_accessed";
    /// A share link was created.
    pub const SHARE_LINK_CREATED: &str = "share_link_created";
}

/// Records events and serves reports to admins.
///
/// Tracking never fails the caller: store errors are logged and dropped.
#[derive(Clone)]
pub struct AnalyticsService {
    store: Arc<dyn Store>,
    config: AnalyticsConfig,
}

impl AnalyticsService {
    /// Creates a new analytics service.
    pub fn new(store: Arc<dyn Store>, config: AnalyticsConfig) -> Self {
        Self { store, config }
    }

    /// Records an event, swallowing failures.
    pub async fn track(&self, event: NewAnalyticsEvent) {
        let event_type = event.event_type.clone();
        match self.store.track_event(event).await {
            Ok(()) => debug!(event_type = %event_type, "Analytics event tracked"),
            Err(e) => warn!(event_type = %event_type, error = %e, "Failed to track analytics event"),
        }
    }

    /// Records an event in the background.
    pub fn track_detached(&self, event: NewAnalyticsEvent) {
        let service = self.clone();
        tokio::spawn(async move {
            service.track(event).await;
        });
    }

    /// Totals over all events.
    pub async fn summary(&self, ctx: &RequestContext) -> AppResult<AnalyticsSummary> {
        self.require_admin(ctx)?;
        self.store.get_analytics_summary().await
    }

    /// Most recent events, newest first, capped by configuration.
    pub async fn recent(
        &self,
        ctx: &RequestContext,
        limit: Option<usize>,
    ) -> AppResult<Vec<AnalyticsEvent>> {
        self.require_admin(ctx)?;
        let limit = limit
            .unwrap_or(50)
            .clamp(1, self.config.max_recent_events.max(1));
        self.store.get_recent_events(limit).await
    }

    /// Daily totals for the last `days` days, capped by configuration.
    pub async fn daily(&self, ctx: &RequestContext, days: Option<u32>) -> AppResult<Vec<DailyStat>> {
        self.require_admin(ctx)?;
        let days = days.unwrap_or(30).clamp(1, self.config.max_daily_days.max(1));
        self.store.get_daily_stats(days).await
    }

    fn require_admin(&self, ctx: &RequestContext) -> AppResult<()> {
        match ctx.email.as_deref() {
            Some(email) if self.config.is_admin(email) => Ok(()),
            _ => Err(AppError::forbidden("Analytics reports are restricted to administrators")),
        }
    }
}
