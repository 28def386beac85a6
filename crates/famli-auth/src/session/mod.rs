//! Session cookies and login flows.

pub mod cookie;
pub mod manager;

pub use cookie::SessionCookies;
pub use manager::{LoginResult, SessionManager};
