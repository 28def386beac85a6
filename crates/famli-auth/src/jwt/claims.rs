//! Session token claims.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Not-before timestamp (seconds since epoch).
    pub nbf: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Email of the user at issuance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Unique token id.
    pub jti: Uuid,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}
