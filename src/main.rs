//! Scrip Search Backend Server
//!
//! REST API server for instrument search, watchlist hydration and option-chain
//! lookups over the contract cache.

use axum::body::Body;
use chrono::Utc;
use scrip_search_backend::api::{create_router, request_span};
use scrip_search_backend::config::Config;
use scrip_search_backend::state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use scrip_search_backend::error::ErrorResponse;
use scrip_search_backend::models::{
    ExpiriesResponse, HealthResponse, HydrateRequest, ScripListResponse, SearchResultRecord,
};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        scrip_search_backend::api::handlers::health_check,
        scrip_search_backend::api::handlers::search_scrips,
        scrip_search_backend::api::handlers::legacy_search_scrips,
        scrip_search_backend::api::handlers::hydrate_scrips,
        scrip_search_backend::api::handlers::list_expiries,
        scrip_search_backend::api::handlers::get_strike_window,
    ),
    components(
        schemas(
            HealthResponse,
            SearchResultRecord,
            ScripListResponse,
            ExpiriesResponse,
            HydrateRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Search", description = "Instrument search"),
        (name = "Watchlist", description = "Watchlist hydration"),
        (name = "Option Chain", description = "Option-chain expiries and strike windows"),
    ),
    info(
        title = "Scrip Search API",
        version = "0.1.0",
        description = "REST API for instrument search and contract caching",
        license(name = "MIT"),
        contact(name = "Joaquin Bejar", email = "jb@taunais.com")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::from_env_or_default(&config_path)?;
    info!(path = %config_path, backend = ?config.cache.backend, "Configuration loaded");

    // Create application state
    let state = Arc::new(AppState::from_config(&config).await?);

    if config.watchlist.warm_on_start {
        match state.watchlist.warm(Utc::now()).await {
            Ok(warmed) => info!(warmed, "Watchlist cache warmed"),
            Err(e) => warn!("Watchlist warm-up failed: {}", e),
        }
    }

    let host = &config.server.host;
    let port = config.server.port;
    info!("Starting Scrip Search Backend on {}:{}", host, port);
    info!(
        "Swagger UI available at http://{}:{}/swagger-ui/",
        host, port
    );

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = create_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>));

    // Start the server
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
