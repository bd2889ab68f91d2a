#![allow(dead_code)]
//! Images, inventories, envelopes and request builders

use axum::body::Body;
use axum::http::Request;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use std::io::Cursor;
use std::sync::Arc;

use plantguard_id::services::{
    Classifier, IdentificationOrchestrator, InvasiveVerifier, Inventory, VerifierTransport,
};
use plantguard_id::{build_router, AppState};

const BOUNDARY: &str = "plantguard-test-boundary";

/// Probabilities for [`sample_inventory`], in inventory order
pub const SAMPLE_PROBABILITIES: [f64; 8] = [0.05, 0.30, 0.02, 0.15, 0.25, 0.08, 0.10, 0.05];

/// Eight species across five genera and four families
pub fn sample_inventory() -> Inventory {
    Inventory::from_entries(vec![
        ("Salvia splendens", "Salvia", "Lamiaceae"),
        ("Eichhornia crassipes", "Eichhornia", "Pontederiaceae"),
        ("Salvia officinalis", "Salvia", "Lamiaceae"),
        ("Mentha spicata", "Mentha", "Lamiaceae"),
        ("Ailanthus altissima", "Ailanthus", "Simaroubaceae"),
        ("Mentha aquatica", "Mentha", "Lamiaceae"),
        ("Acacia dealbata", "Acacia", "Fabaceae"),
        ("Acacia melanoxylon", "Acacia", "Fabaceae"),
    ])
}

/// Small gradient PNG
pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 11 % 256) as u8, 120])
    });
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

/// Generate-content envelope wrapping `text`
pub fn envelope(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] }
        }]
    })
}

/// POST with a single multipart `file` part
pub fn multipart_request(uri: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"plant.png\"\r\n",
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Router wired to the given classifier and transport
pub fn test_app(
    classifier: Arc<dyn Classifier>,
    transport: Box<dyn VerifierTransport>,
) -> axum::Router {
    let verifier = Arc::new(InvasiveVerifier::new(transport));
    let orchestrator = Arc::new(IdentificationOrchestrator::new(classifier, verifier));
    build_router(AppState::new(orchestrator))
}
