//! Request context carrying the authenticated user and the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Network identity of the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// IP address of the request origin.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
}

impl ClientInfo {
    /// Creates client info.
    pub fn new(ip_address: impl Into<String>, user_agent: Option<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            user_agent,
        }
    }
}

/// Context for the current authenticated request.
///
/// Extracted from the session by the API layer and passed into service
/// methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's email as carried by the session.
    pub email: Option<String>,
    /// The caller.
    pub client: ClientInfo,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, email: Option<String>, client: ClientInfo) -> Self {
        Self {
            user_id,
            email,
            client,
            request_time: Utc::now(),
        }
    }
}
