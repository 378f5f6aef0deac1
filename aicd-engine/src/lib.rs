//! aicd-engine library interface
//!
//! Heuristic AI-content detection for images and audio, with optional
//! external classifiers fused into the verdict. Exposed as a library for
//! integration testing and served over HTTP by the `aicd-engine` binary.

pub mod annotation;
pub mod api;
pub mod classifiers;
pub mod error;
pub mod extractors;
pub mod fusion;
pub mod presentation;
pub mod scoring;
pub mod session;
pub mod types;
pub mod utils;

pub use crate::error::{ApiError, ApiResult};

use aicd_common::config::TomlConfig;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use classifiers::ClassifierChain;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Effective configuration
    pub config: Arc<TomlConfig>,
    /// External classifiers in fallback order
    pub classifiers: Arc<ClassifierChain>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: TomlConfig, classifiers: ClassifierChain) -> Self {
        Self {
            config: Arc::new(config),
            classifiers: Arc::new(classifiers),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_body_bytes;

    Router::new()
        .merge(api::analyze_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
