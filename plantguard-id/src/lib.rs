//! plantguard-id library interface
//!
//! Exposes the identification pipeline and router for the binary and for
//! integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::{extract::DefaultBodyLimit, Router};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::services::IdentificationOrchestrator;

/// Default upload limit when none is configured
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across handlers
///
/// Built once in `main`; handlers only read it.
#[derive(Clone)]
pub struct AppState {
    /// Classifier + verifier pipeline
    pub orchestrator: Arc<IdentificationOrchestrator>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Request body limit in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(orchestrator: Arc<IdentificationOrchestrator>) -> Self {
        Self {
            orchestrator,
            startup_time: Utc::now(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .merge(api::health_routes())
        .merge(api::identify_routes())
        .merge(api::inventory_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(api::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
