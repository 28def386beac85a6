//! Per-user settings.

pub mod service;

pub use service::SettingsService;
