//! Route definitions for the Famli HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(guardian_routes())
        .merge(item_routes())
        .merge(settings_routes())
        .merge(share_routes())
        .merge(shared_routes())
        .merge(analytics_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(state.config.server.max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Auth endpoints: register, login, google, apple, logout, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/google", post(handlers::auth::google))
        .route("/auth/apple", post(handlers::auth::apple))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

fn guardian_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/guardians",
            get(handlers::guardian::list_guardians).post(handlers::guardian::add_guardian),
        )
        .route("/guardians/{id}", delete(handlers::guardian::delete_guardian))
}

fn item_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            get(handlers::item::list_items).post(handlers::item::create_item),
        )
        .route(
            "/items/{id}",
            get(handlers::item::get_item)
                .put(handlers::item::update_item)
                .delete(handlers::item::delete_item),
        )
}

fn settings_routes() -> Router<AppState> {
    Router::new().route(
        "/settings",
        get(handlers::settings::get_settings).put(handlers::settings::update_settings),
    )
}

/// Owner-side share link management
fn share_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/share-links",
            get(handlers::share::list_links).post(handlers::share::create_link),
        )
        .route("/share-links/{id}", delete(handlers::share::delete_link))
        .route(
            "/share-links/{id}/accesses",
            get(handlers::share::list_accesses),
        )
}

/// Public share access (no auth)
fn shared_routes() -> Router<AppState> {
    Router::new()
        .route("/shared/{token}", get(handlers::shared::resolve))
        .route("/shared/{token}/verify", post(handlers::shared::verify_pin))
}

fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/track", post(handlers::analytics::track))
        .route("/analytics/summary", get(handlers::analytics::summary))
        .route("/analytics/recent", get(handlers::analytics::recent))
        .route("/analytics/daily", get(handlers::analytics::daily))
}
