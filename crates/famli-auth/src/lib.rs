//! # famli-auth
//!
//! Authentication for the Famli backend.
//!
//! ## Modules
//!
//! - `jwt`: session token issuing and validation (HS256)
//! - `password`: Argon2id hashing and password policy
//! - `session`: session cookies and the login flows
//! - `oauth`: Google and Apple identity token verification

pub mod jwt;
pub mod oauth;
pub mod password;
pub mod session;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, SessionToken};
pub use oauth::{OAuthVerifier, OAuthVerifiers};
pub use password::{PasswordHasher, PasswordValidator};
pub use session::{LoginResult, SessionCookies, SessionManager};
