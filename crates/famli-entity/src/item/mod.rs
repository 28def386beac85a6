//! Box item domain entities.

pub mod model;

pub use model::{BoxItem, CreateBoxItem, UpdateBoxItem};
