//! # famli-api
//!
//! HTTP API layer for Famli built on Axum.
//!
//! Provides all REST endpoints, middleware (CORS, logging), extractors,
//! DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, load_codec, run_server};
pub use error::ApiError;
pub use state::AppState;
