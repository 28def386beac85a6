//! CORS layer configuration.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use famli_core::config::CorsConfig;

/// Builds a CORS tower layer from configuration.
///
/// A `*` origin allows any site but disables credentials, since browsers
/// refuse credentialed responses with a wildcard origin. Listed origins
/// may send the session cookie.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods(methods)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(config.max_age_seconds));

    if config.allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    layer.allow_origin(origins).allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_for_wildcard_and_list() {
        let wildcard = CorsConfig {
            allowed_origins: vec!["*".to_string()],
            ..CorsConfig::default()
        };
        let _ = build_cors_layer(&wildcard);

        let listed = CorsConfig {
            allowed_origins: vec!["https://famli.app".to_string(), "not a header\n".to_string()],
            ..CorsConfig::default()
        };
        let _ = build_cors_layer(&listed);
    }
}
