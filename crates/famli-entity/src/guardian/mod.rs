//! Guardian domain entities.

pub mod model;

pub use model::{CreateGuardian, Guardian};
