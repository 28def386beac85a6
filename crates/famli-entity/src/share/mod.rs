//! Share link domain entities.

pub mod access;
pub mod model;
pub mod view;

pub use access::ShareLinkAccess;
pub use model::{CreateShareLink, ShareLink, ShareLinkType};
pub use view::{SharedGuardian, SharedItem, SharedView};
