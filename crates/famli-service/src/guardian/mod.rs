//! Guardians: the people a user's legacy is meant for.

pub mod service;

pub use service::{AddGuardianRequest, GuardianService};
