//! Box items with transparent encryption of sensitive content.

pub mod service;

pub use service::{CreateItemRequest, ItemService};
