//! HTTP client library for the Scrip Search API.
//!
//! This crate provides a typed HTTP client for the instrument search backend:
//! index-backed and legacy search, watchlist hydration and option-chain lookups.
//!
//! # Example
//!
//! ```no_run
//! use scrip_client::{ScripClient, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), scrip_client::Error> {
//!     let client = ScripClient::with_base_url("http://localhost:8080")?;
//!
//!     let results = client
//!         .search(&SearchQuery::new("reli").exchange("NSE"))
//!         .await?;
//!     for record in results.data {
//!         println!("{} {}", record.exchange, record.display_name);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{ClientConfig, ScripClient};
pub use error::Error;
pub use types::*;
