//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every section falls back to its defaults when omitted.

pub mod analytics;
pub mod app;
pub mod auth;
pub mod codec;
pub mod logging;
pub mod oauth;
pub mod share;

use serde::{Deserialize, Serialize};

pub use self::analytics::AnalyticsConfig;
pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::codec::CodecConfig;
pub use self::logging::LoggingConfig;
pub use self::oauth::OAuthConfig;
pub use self::share::ShareConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Session and password settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Sensitive-field encryption settings.
    #[serde(default)]
    pub codec: CodecConfig,
    /// Federated login settings.
    #[serde(default)]
    pub oauth: OAuthConfig,
    /// Share link settings.
    #[serde(default)]
    pub share: ShareConfig,
    /// Analytics settings.
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `FAMLI__`
    /// (e.g. `FAMLI__AUTH__JWT_SECRET`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FAMLI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::internal(format!("Failed to deserialize config: {e}")))
    }
}
