//! Analytics configuration.

use serde::{Deserialize, Serialize};

/// Who may read analytics reports and how much they may ask for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Emails of accounts allowed to read analytics reports.
    #[serde(default)]
    pub admin_emails: Vec<String>,
    /// Upper bound for the recent-events listing.
    #[serde(default = "default_max_recent")]
    pub max_recent_events: usize,
    /// Upper bound for the daily-stats window, in days.
    #[serde(default = "default_max_days")]
    pub max_daily_days: u32,
}

impl AnalyticsConfig {
    /// Returns whether the given email may read reports.
    pub fn is_admin(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            admin_emails: Vec::new(),
            max_recent_events: default_max_recent(),
            max_daily_days: default_max_days(),
        }
    }
}

fn default_max_recent() -> usize {
    200
}

fn default_max_days() -> u32 {
    90
}
