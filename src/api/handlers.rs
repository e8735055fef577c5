//! API request handlers.

use crate::error::ApiError;
use crate::models::{
    ExpiriesResponse, HealthResponse, HydrateRequest, LegacySearchQuery, OptionChainQuery,
    ScripListResponse, ScripSearchQuery,
};
use crate::search::SearchRequest;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

/// Resolves the requested capacity against the configured limits.
fn resolve_capacity(state: &AppState, requested: Option<usize>) -> Result<usize, ApiError> {
    match requested {
        None => Ok(state.search.default_capacity),
        Some(0) => Err(ApiError::InvalidRequest(
            "capacity must be positive".to_string(),
        )),
        Some(capacity) => Ok(capacity.min(state.search.max_capacity)),
    }
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service status and cache liveness", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let cache = match state.contracts.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Contract cache ping failed: {}", e);
            false
        }
    };

    Json(HealthResponse {
        status: if cache { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache,
    })
}

// ============================================================================
// Search
// ============================================================================

/// Search instruments through the smart cache.
#[utoipa::path(
    get,
    path = "/api/v2/scrips/search",
    params(ScripSearchQuery),
    responses(
        (status = 200, description = "Matching instruments in rank order", body = ScripListResponse),
        (status = 400, description = "Invalid capacity", body = crate::error::ErrorResponse),
        (status = 500, description = "Backing store failure", body = crate::error::ErrorResponse)
    ),
    tag = "Search"
)]
pub async fn search_scrips(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScripSearchQuery>,
) -> Result<Json<ScripListResponse>, ApiError> {
    let capacity = resolve_capacity(&state, query.capacity)?;
    let request = SearchRequest {
        text: query.search_text,
        exchange: query.exchange,
        offset: query.offset,
        capacity,
    };

    let data = state.searcher.search(&request).await?;
    Ok(Json(ScripListResponse::success(data)))
}

/// Search instruments through the document store.
#[utoipa::path(
    get,
    path = "/api/v1/scrips/search",
    params(LegacySearchQuery),
    responses(
        (status = 200, description = "One page of matching instruments", body = ScripListResponse),
        (status = 500, description = "Document store failure or not configured", body = crate::error::ErrorResponse)
    ),
    tag = "Search"
)]
pub async fn legacy_search_scrips(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LegacySearchQuery>,
) -> Result<Json<ScripListResponse>, ApiError> {
    let data = state
        .legacy
        .search(&query.search_text, query.exchange.as_deref(), query.page)
        .await?;
    Ok(Json(ScripListResponse::success(data)))
}

// ============================================================================
// Watchlist
// ============================================================================

/// Hydrate watchlist keys into instrument records.
#[utoipa::path(
    post,
    path = "/api/v1/scrips/hydrate",
    request_body = HydrateRequest,
    responses(
        (status = 200, description = "Hydrated records in request order", body = ScripListResponse),
        (status = 500, description = "Backing store failure", body = crate::error::ErrorResponse)
    ),
    tag = "Watchlist"
)]
pub async fn hydrate_scrips(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HydrateRequest>,
) -> Result<Json<ScripListResponse>, ApiError> {
    let data = state.watchlist.hydrate(&request.keys, Utc::now()).await?;
    Ok(Json(ScripListResponse::success(data)))
}

// ============================================================================
// Option Chain
// ============================================================================

/// List expiries of an underlying.
#[utoipa::path(
    get,
    path = "/api/v1/option-chain/{underlying}/expiries",
    params(
        ("underlying" = String, Path, description = "Underlying symbol")
    ),
    responses(
        (status = 200, description = "Expiries in lexical order", body = ExpiriesResponse),
        (status = 500, description = "Backing store failure", body = crate::error::ErrorResponse)
    ),
    tag = "Option Chain"
)]
pub async fn list_expiries(
    State(state): State<Arc<AppState>>,
    Path(underlying): Path<String>,
) -> Result<Json<ExpiriesResponse>, ApiError> {
    let data = state.option_chain.expiries(&underlying).await?;
    Ok(Json(ExpiriesResponse::success(data)))
}

/// Options of one expiry within a strike window.
#[utoipa::path(
    get,
    path = "/api/v1/option-chain/{underlying}/{expiry}",
    params(
        ("underlying" = String, Path, description = "Underlying symbol"),
        ("expiry" = String, Path, description = "Expiry as listed by the expiries endpoint"),
        OptionChainQuery
    ),
    responses(
        (status = 200, description = "Options ascending by strike", body = ScripListResponse),
        (status = 400, description = "Invalid price or width", body = crate::error::ErrorResponse),
        (status = 500, description = "Backing store failure", body = crate::error::ErrorResponse)
    ),
    tag = "Option Chain"
)]
pub async fn get_strike_window(
    State(state): State<Arc<AppState>>,
    Path((underlying, expiry)): Path<(String, String)>,
    Query(query): Query<OptionChainQuery>,
) -> Result<Json<ScripListResponse>, ApiError> {
    if !query.price.is_finite() || query.price <= 0.0 {
        return Err(ApiError::InvalidRequest(
            "price must be positive".to_string(),
        ));
    }
    if !query.width.is_finite() || query.width < 0.0 {
        return Err(ApiError::InvalidRequest(
            "width must not be negative".to_string(),
        ));
    }

    let data = state
        .option_chain
        .strike_window(&underlying, &expiry, query.price, query.width)
        .await?;
    Ok(Json(ScripListResponse::success(data)))
}
