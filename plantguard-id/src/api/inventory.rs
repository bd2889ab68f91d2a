//! Species listing and search

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

/// GET /species query
#[derive(Debug, Deserialize)]
pub struct SpeciesQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// GET /species response
#[derive(Debug, Serialize)]
pub struct SpeciesPage {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub species: Vec<String>,
}

/// GET /search query
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub limit: Option<usize>,
}

/// GET /search response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub keyword: String,
    pub total: usize,
    pub results: Vec<String>,
}

fn validate_limit(limit: Option<usize>) -> ApiResult<usize> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }
    Ok(limit)
}

/// GET /species
///
/// Page through the species inventory.
pub async fn list_species(
    State(state): State<AppState>,
    query: Result<Query<SpeciesQuery>, QueryRejection>,
) -> ApiResult<Json<SpeciesPage>> {
    let Query(query) = query?;
    let limit = validate_limit(query.limit)?;
    let offset = query.offset.unwrap_or(0);

    let names = state.orchestrator.classifier().inventory().species_names();
    let species = names.iter().skip(offset).take(limit).cloned().collect();

    Ok(Json(SpeciesPage {
        total: names.len(),
        limit,
        offset,
        species,
    }))
}

/// GET /search
///
/// Case-sensitive substring match over species names.
pub async fn search_species(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Query(query) = query?;
    let keyword = query
        .keyword
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::BadRequest("keyword must not be empty".to_string()))?;
    let limit = validate_limit(query.limit)?;

    let results: Vec<String> = state
        .orchestrator
        .classifier()
        .inventory()
        .species_names()
        .iter()
        .filter(|name| name.contains(keyword.as_str()))
        .take(limit)
        .cloned()
        .collect();

    Ok(Json(SearchResponse {
        keyword,
        total: results.len(),
        results,
    }))
}

/// Build inventory routes
pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/species", get(list_species))
        .route("/search", get(search_species))
}
