//! HTTP request handlers, grouped by resource.

pub mod analytics;
pub mod auth;
pub mod guardian;
pub mod health;
pub mod item;
pub mod settings;
pub mod share;
pub mod shared;
