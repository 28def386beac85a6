//! Analytics entities.

pub mod model;

pub use model::{AnalyticsEvent, AnalyticsSummary, DailyStat, NewAnalyticsEvent};
