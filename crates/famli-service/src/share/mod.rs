//! Share links: owner management and public access.

pub mod access;
pub mod link;
pub mod projection;
pub mod service;

pub use access::{AccessService, PinChallenge, ShareResolution};
pub use link::LinkService;
pub use service::{CreateShareLinkRequest, ShareLinkSummary, ShareService};
