//! # famli-entity
//!
//! Domain entity models for Famli. Every struct in this crate represents a
//! stored record or a domain value object. All entities derive `Debug`,
//! `Clone`, `Serialize`, and `Deserialize`.

pub mod analytics;
pub mod guardian;
pub mod item;
pub mod settings;
pub mod share;
pub mod user;
