//! # Scrip Search Backend - REST API Server
//!
//! Instrument search and caching for a brokerage backend. Free text typed by a
//! user ("reli", "NIFTY 22000", "M&M") is resolved into ranked, display-ready
//! instruments using a full-text search index for matching and a keyed
//! contract cache for the canonical records.
//!
//! ## Key Features
//!
//! - **Multi-pass search**: exchange-scoped prefix queries, unscoped
//!   prefix-then-substring fill, strike lookups for numeric input and a fuzzy
//!   fallback when nothing matches.
//!
//! - **Alternate listings**: equities listed on both NSE and BSE carry the
//!   other listing nested under `Alternate`.
//!
//! - **Display names**: derivative trading symbols are rendered as
//!   `NIFTY APR 24 22000 CE` or `GOLD 25FEB FUT`.
//!
//! - **Watchlist hydration**: saved keys are hydrated through a cache that
//!   expires at the daily contract refresh.
//!
//! - **Pluggable backends**: Redis with RediSearch, or in-process stores
//!   seeded from JSON; an optional PostgreSQL store serves the legacy search.
//!
//! ## Architecture
//!
//! ```text
//! HTTP (axum)
//!   └── search::ScripSearcher ──► cache::SmartCache ──► SearchIndex (FT.SEARCH | memory)
//!         └── search::Hydrator ──► ContractStore (HGET/HSCAN/ZRANGE* | memory)
//!   └── search::LegacySearcher ──► InstrumentDocuments (Postgres | memory)
//!   └── search::WatchlistHydrator ──► HydrationCache (DashMap, daily expiry)
//!   └── search::OptionChainService ──► ContractStore sorted sets
//! ```
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Route handlers and router configuration |
//! | [`cache`] | Contract cache, search index and hydration cache |
//! | [`config`] | TOML configuration |
//! | [`db`] | Instrument document store |
//! | [`error`] | API error types with `IntoResponse` implementation |
//! | [`models`] | Request/response DTOs with OpenAPI schemas |
//! | [`scrip`] | Instrument records, symbol parsing and field derivation |
//! | [`search`] | Search, hydration and option-chain services |
//! | [`seed`] | JSON seeding of the in-process backends |
//! | [`state`] | Application state management |
//!
//! ## API Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/health` | Health check with cache liveness |
//! | GET | `/api/v2/scrips/search` | Index-backed search |
//! | GET | `/api/v1/scrips/search` | Legacy document-store search |
//! | POST | `/api/v1/scrips/hydrate` | Watchlist hydration |
//! | GET | `/api/v1/option-chain/{underlying}/expiries` | Expiries of an underlying |
//! | GET | `/api/v1/option-chain/{underlying}/{expiry}` | Strike window |
//!
//! ## Example Usage
//!
//! ```bash
//! # In-memory backend seeded from data/seed.json
//! CONFIG_PATH=config.toml cargo run
//!
//! curl 'http://localhost:8080/api/v2/scrips/search?searchText=reli&exchange=NSE'
//! curl 'http://localhost:8080/api/v2/scrips/search?searchText=22000&capacity=5'
//! curl -X POST http://localhost:8080/api/v1/scrips/hydrate \
//!   -H "Content-Type: application/json" \
//!   -d '{"keys": ["NSE_2885", "BSE_500325"]}'
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod scrip;
pub mod search;
pub mod seed;
pub mod state;
