//! Analytics event and report models.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded usage event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// Unique event identifier.
    pub id: Uuid,
    /// Event name, e.g. `login` or `share_link_accessed`.
    pub event_type: String,
    /// Acting user, if known.
    pub user_id: Option<Uuid>,
    /// Frontend path the event came from.
    pub path: Option<String>,
    /// Free-form event details.
    pub metadata: serde_json::Value,
    /// When the event was recorded.
    pub created_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    /// Stamps a new event with an id and the current time.
    pub fn from_new(event: NewAnalyticsEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: event.event_type,
            user_id: event.user_id,
            path: event.path,
            metadata: event.metadata,
            created_at: Utc::now(),
        }
    }
}

/// Data for recording an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnalyticsEvent {
    /// Event name.
    pub event_type: String,
    /// Acting user.
    pub user_id: Option<Uuid>,
    /// Frontend path.
    pub path: Option<String>,
    /// Free-form details.
    pub metadata: serde_json::Value,
}

impl NewAnalyticsEvent {
    /// A server-side event with no path or metadata.
    pub fn named(event_type: impl Into<String>, user_id: Option<Uuid>) -> Self {
        Self {
            event_type: event_type.into(),
            user_id,
            path: None,
            metadata: serde_json::Value::Null,
        }
    }

    /// Attaches details to the event.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Aggregate counters over all recorded events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    /// Number of events.
    pub total_events: u64,
    /// Number of distinct known users.
    pub unique_users: u64,
    /// Event count per event type.
    pub events_by_type: BTreeMap<String, u64>,
}

/// Per-day counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
    /// Calendar day (UTC).
    pub date: NaiveDate,
    /// Number of events that day.
    pub events: u64,
    /// Number of distinct known users that day.
    pub unique_users: u64,
}
