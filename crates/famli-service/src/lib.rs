//! # famli-service
//!
//! Business logic service layer for Famli. Each service orchestrates the
//! store, the field codec and the password hasher to implement one family
//! of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod analytics;
pub mod context;
pub mod guardian;
pub mod item;
pub mod settings;
pub mod share;

pub use analytics::AnalyticsService;
pub use context::{ClientInfo, RequestContext};
pub use guardian::GuardianService;
pub use item::ItemService;
pub use settings::SettingsService;
pub use share::{AccessService, LinkService, ShareResolution, ShareService};
