//! Application builder: wires state, router and middleware into a server.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;

use famli_auth::oauth::OAuthVerifiers;
use famli_core::config::AppConfig;
use famli_core::error::{AppError, ErrorKind};
use famli_core::result::AppResult;
use famli_crypto::{FieldCodec, KeyParams};
use famli_store::MemoryStore;

use crate::router::build_router;
use crate::state::AppState;

/// Placeholder secret shipped in `config/default.toml`.
const DEFAULT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Builds the field codec, creating the salt file on first start.
///
/// A salt given directly in configuration takes precedence over the file.
pub async fn load_codec(config: &AppConfig) -> AppResult<FieldCodec> {
    let codec_config = &config.codec;
    let params = KeyParams::from(codec_config);

    if let Some(salt) = codec_config.salt.as_deref().filter(|s| !s.trim().is_empty()) {
        return FieldCodec::with_encoded_salt(&codec_config.secret, salt.trim(), params)
            .map_err(AppError::from);
    }

    let path = Path::new(&codec_config.salt_path);
    match tokio::fs::read_to_string(path).await {
        Ok(salt) => {
            tracing::info!(path = %path.display(), "Loaded codec salt");
            FieldCodec::with_encoded_salt(&codec_config.secret, salt.trim(), params)
                .map_err(AppError::from)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let codec = FieldCodec::new(&codec_config.secret, params)?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, codec.encoded_salt()).await?;
            tracing::info!(path = %path.display(), "Generated new codec salt");
            Ok(codec)
        }
        Err(e) => Err(AppError::with_source(
            ErrorKind::Internal,
            format!("Failed to read codec salt '{}'", path.display()),
            e,
        )),
    }
}

/// Runs the Famli server with the given configuration.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    tracing::info!("Starting Famli server...");

    if config.auth.jwt_secret == DEFAULT_SECRET {
        tracing::warn!("auth.jwt_secret is the default value; set FAMLI__AUTH__JWT_SECRET");
    }
    if config.codec.secret == DEFAULT_SECRET {
        tracing::warn!("codec.secret is the default value; set FAMLI__CODEC__SECRET");
    }

    let codec = Arc::new(load_codec(&config).await?);
    let store = Arc::new(MemoryStore::new());
    let verifiers = OAuthVerifiers::from_config(&config.oauth)?;

    tracing::info!(
        google = config.oauth.google_client_id.is_some(),
        apple = config.oauth.apple_client_id.is_some(),
        "OAuth providers configured"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, store, codec, verifiers)?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Famli server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Famli server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_salt_path(path: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.codec.secret = "codec-secret".to_string();
        config.codec.salt_path = path.to_string_lossy().into_owned();
        config.codec.memory_kib = 1024;
        config.codec.iterations = 1;
        config.codec.parallelism = 1;
        config
    }

    #[tokio::test]
    async fn test_salt_file_is_created_then_reused() {
        let dir = std::env::temp_dir().join(format!("famli-salt-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("codec.salt");
        let config = config_with_salt_path(&path);

        let first = load_codec(&config).await.unwrap();
        assert!(path.exists());
        let ciphertext = first.encrypt("segredo").unwrap();

        let second = load_codec(&config).await.unwrap();
        assert_eq!(first.encoded_salt(), second.encoded_salt());
        assert_eq!(second.decrypt(&ciphertext).unwrap(), "segredo");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_configured_salt_wins() {
        let path = std::env::temp_dir().join(format!("famli-unused-{}.salt", uuid::Uuid::new_v4()));
        let mut config = config_with_salt_path(&path);
        let salt = FieldCodec::new("x", KeyParams::from(&config.codec))
            .unwrap()
            .encoded_salt();
        config.codec.salt = Some(salt.clone());

        let codec = load_codec(&config).await.unwrap();
        assert_eq!(codec.encoded_salt(), salt);
        assert!(!path.exists());
    }
}
