//! Identification endpoints
//!
//! POST /identify, POST /identify/quick. Both take a multipart upload with
//! the image in the `file` field.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::QueryRejection,
        Multipart, Query, State,
    },
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::models::{IdentificationOutcome, PixelImage, QuickOutcome};
use crate::services::{image_decoder, MAX_TOP_K, MIN_TOP_K};
use crate::AppState;

const DEFAULT_TOP_K: usize = 5;
const UPLOAD_FIELD: &str = "file";

/// POST /identify query
#[derive(Debug, Deserialize)]
pub struct IdentifyQuery {
    pub topk: Option<usize>,
    pub location: Option<String>,
}

/// POST /identify/quick query
#[derive(Debug, Deserialize)]
pub struct QuickQuery {
    pub location: Option<String>,
}

/// Pull the image part out of the multipart body and decode it
async fn read_upload(mut multipart: Multipart) -> ApiResult<PixelImage> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default();
        if !content_type.starts_with("image/") {
            return Err(ApiError::BadRequest(
                "Incorrect file type. Please upload an image file.".to_string(),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read picture file: {}", e)))?;

        return Ok(image_decoder::decode(&bytes)?);
    }

    Err(ApiError::BadRequest(format!(
        "Missing '{}' upload field",
        UPLOAD_FIELD
    )))
}

/// POST /identify?topk=&location=
///
/// Ranked species/genus/family candidates. A classifier failure is reported
/// in the body's `status`, with HTTP 200 and empty lists.
pub async fn identify(
    State(state): State<AppState>,
    query: Result<Query<IdentifyQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<IdentificationOutcome>> {
    let Query(query) = query?;
    let top_k = query.topk.unwrap_or(DEFAULT_TOP_K);
    if !(MIN_TOP_K..=MAX_TOP_K).contains(&top_k) {
        return Err(ApiError::BadRequest(format!(
            "topk must be between {} and {}",
            MIN_TOP_K, MAX_TOP_K
        )));
    }

    let image = read_upload(multipart?).await?;

    tracing::debug!(
        top_k,
        location = query.location.as_deref().unwrap_or(""),
        width = image.width(),
        height = image.height(),
        "Identify request"
    );

    let outcome = state
        .orchestrator
        .identify(image, top_k, query.location.as_deref())
        .await?;

    Ok(Json(outcome))
}

/// POST /identify/quick?location=
///
/// Best species candidate only. A classifier failure is HTTP 500 with the
/// classifier's status and message.
pub async fn identify_quick(
    State(state): State<AppState>,
    query: Result<Query<QuickQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<QuickOutcome>> {
    let Query(query) = query?;
    let image = read_upload(multipart?).await?;

    let outcome = state
        .orchestrator
        .identify_top1(image, query.location.as_deref())
        .await?;

    match outcome {
        QuickOutcome::Failure { status, message } => {
            Err(ApiError::Classification { status, message })
        }
        success => Ok(Json(success)),
    }
}

/// Build identification routes
pub fn identify_routes() -> Router<AppState> {
    Router::new()
        .route("/identify", post(identify))
        .route("/identify/quick", post(identify_quick))
}
