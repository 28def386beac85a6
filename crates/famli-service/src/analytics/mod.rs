//! Product analytics: event tracking and admin reports.

pub mod service;

pub use service::{AnalyticsService, events};
