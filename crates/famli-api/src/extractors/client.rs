//! `ClientMeta` extractor: caller IP and User-Agent.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

use famli_service::context::ClientInfo;

/// The caller's network identity.
#[derive(Debug, Clone)]
pub struct ClientMeta(pub ClientInfo);

impl ClientMeta {
    /// Reads client info from request parts.
    ///
    /// The first `X-Forwarded-For` hop wins, then `X-Real-IP`, then the
    /// socket peer address.
    pub fn from_parts(parts: &Parts) -> ClientInfo {
        let ip_address = forwarded_ip(&parts.headers)
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string());

        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        ClientInfo::new(ip_address, user_agent)
    }
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(',').next().unwrap_or_default().trim().to_string())
            .filter(|v| !v.is_empty())
    };
    header("x-forwarded-for").or_else(|| header("x-real-ip"))
}

impl<S> FromRequestParts<S> for ClientMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(Self::from_parts(parts)))
    }
}
