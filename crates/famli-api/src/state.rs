//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use axum::http::HeaderMap;

use famli_auth::oauth::OAuthVerifiers;
use famli_auth::password::PasswordHasher;
use famli_auth::session::{SessionCookies, SessionManager};
use famli_core::config::AppConfig;
use famli_core::result::AppResult;
use famli_crypto::FieldCodec;
use famli_service::share::LinkService;
use famli_service::{
    AccessService, AnalyticsService, GuardianService, ItemService, SettingsService, ShareService,
};
use famli_store::Store;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Auth ─────────────────────────────────────────────────
    /// Login flows and session validation
    pub session_manager: Arc<SessionManager>,
    /// Session cookie builder
    pub cookies: SessionCookies,

    // ── Services ─────────────────────────────────────────────
    /// Box items
    pub item_service: ItemService,
    /// Guardians
    pub guardian_service: GuardianService,
    /// Settings
    pub settings_service: SettingsService,
    /// Share link management
    pub share_service: ShareService,
    /// Public share access
    pub access_service: AccessService,
    /// Analytics
    pub analytics_service: AnalyticsService,
}

impl AppState {
    /// Wires every service around `store` and `codec`.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn Store>,
        codec: Arc<FieldCodec>,
        verifiers: OAuthVerifiers,
    ) -> AppResult<Self> {
        let password_hasher = Arc::new(PasswordHasher::from_config(&config.auth)?);

        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&store),
            Arc::clone(&password_hasher),
            verifiers,
            &config.auth,
        )?);

        let analytics_service =
            AnalyticsService::new(Arc::clone(&store), config.analytics.clone());
        let item_service = ItemService::new(Arc::clone(&store), codec);
        let link_service = Arc::new(LinkService::new(config.share.clone()));

        let share_service = ShareService::new(
            Arc::clone(&store),
            link_service,
            Arc::clone(&password_hasher),
            analytics_service.clone(),
        );
        let access_service = AccessService::new(
            Arc::clone(&store),
            password_hasher,
            item_service.clone(),
            analytics_service.clone(),
        );

        Ok(Self {
            cookies: SessionCookies::from_config(&config.auth),
            session_manager,
            guardian_service: GuardianService::new(Arc::clone(&store)),
            settings_service: SettingsService::new(store),
            item_service,
            share_service,
            access_service,
            analytics_service,
            config: Arc::new(config),
        })
    }

    /// Whether the request reached us over TLS.
    ///
    /// `X-Forwarded-Proto` is only honoured when the server is configured
    /// to trust its reverse proxy.
    pub fn is_secure_request(&self, headers: &HeaderMap) -> bool {
        if self.config.server.tls_enabled {
            return true;
        }
        self.config.server.trust_forwarded_proto
            && headers
                .get("x-forwarded-proto")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"))
    }
}
