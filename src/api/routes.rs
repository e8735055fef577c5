//! Route configuration.

use crate::api::handlers;
use crate::state::AppState;
use axum::Router;
use axum::http::Request;
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::{Span, info_span};

/// Header naming the calling client.
pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// Header correlating a request across services.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Creates the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Search
        .route("/api/v2/scrips/search", get(handlers::search_scrips))
        .route("/api/v1/scrips/search", get(handlers::legacy_search_scrips))
        // Watchlist
        .route("/api/v1/scrips/hydrate", post(handlers::hydrate_scrips))
        // Option chain
        .route(
            "/api/v1/option-chain/{underlying}/expiries",
            get(handlers::list_expiries),
        )
        .route(
            "/api/v1/option-chain/{underlying}/{expiry}",
            get(handlers::get_strike_window),
        )
        .with_state(state)
}

/// Request span carrying the client and request identifiers when present.
pub fn request_span<B>(request: &Request<B>) -> Span {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string()
    };

    info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        client_id = %header(CLIENT_ID_HEADER),
        request_id = %header(REQUEST_ID_HEADER),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_span_accepts_missing_headers() {
        let request = Request::builder()
            .uri("/health")
            .body(())
            .unwrap();
        let _span = request_span(&request);
    }

    #[test]
    fn test_request_span_with_headers() {
        let request = Request::builder()
            .uri("/api/v2/scrips/search?searchText=reli")
            .header(CLIENT_ID_HEADER, "web")
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(())
            .unwrap();
        let _span = request_span(&request);
    }
}
