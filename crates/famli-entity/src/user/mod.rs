//! User domain entities.

pub mod model;
pub mod provider;

pub use model::{CreateUser, SocialProfile, User};
pub use provider::AuthProvider;
