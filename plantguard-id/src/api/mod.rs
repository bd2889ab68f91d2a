//! HTTP API handlers
//!
//! Routing and request validation only; identification logic lives in
//! [`crate::services::IdentificationOrchestrator`].

pub mod health;
pub mod identify;
pub mod inventory;

pub use health::health_routes;
pub use identify::identify_routes;
pub use inventory::inventory_routes;

use axum::response::{IntoResponse, Response};
use std::any::Any;

use crate::error::ApiError;

/// Convert a handler panic into the generic server-error body
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());

    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}
