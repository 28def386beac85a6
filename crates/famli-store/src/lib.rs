//! # famli-store
//!
//! The persistence collaborator for Famli. The traits in [`traits`] are the
//! contract every service depends on; [`memory::MemoryStore`] is a
//! process-local implementation backed by concurrent hash maps.
//!
//! Per-key read-modify-write is atomic. In particular the share link usage
//! increment is conditional, so a link never counts more uses than its cap.

pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::{
    AnalyticsStore, GuardianStore, ItemStore, SettingsStore, ShareLinkStore, Store, UserStore,
};
