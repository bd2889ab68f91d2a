//! Service description and health check

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// GET / response
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub health: String,
    pub identify: String,
    pub version: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process serves requests
    pub status: String,
    /// Whether a scoring backend is configured
    pub model_loaded: bool,
    pub supported_species: usize,
    pub supported_genus: usize,
    pub supported_family: usize,
    /// Seconds since service started
    pub uptime_seconds: u64,
}

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "PlantGuard plant identification API".to_string(),
        health: "/health".to_string(),
        identify: "/identify".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let classifier = state.orchestrator.classifier();
    let inventory = classifier.inventory();

    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: classifier.is_ready(),
        supported_species: inventory.species_names().len(),
        supported_genus: inventory.genus_names().len(),
        supported_family: inventory.family_names().len(),
        uptime_seconds: uptime.num_seconds().max(0) as u64,
    })
}

/// Build root and health routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}
