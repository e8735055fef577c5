//! Search, hydration and option-chain endpoint tests.

use scrip_client::{Error, LegacySearchQuery, SearchQuery, StrikeWindowQuery};
use scrip_tests::{create_test_client, stock_keys};

// ============================================================================
// Index Search
// ============================================================================

#[tokio::test]
async fn test_search_scoped_prefix() {
    let client = create_test_client().expect("Failed to create client");

    let response = client
        .search(&SearchQuery::new("reli").exchange("NSE"))
        .await
        .expect("Search failed");

    assert!(response.status);
    assert_eq!(stock_keys(&response), vec!["NSE_2885"]);
    let alternate = response.data[0].alternate.as_ref().expect("alternate");
    assert_eq!(alternate.stock_key(), "BSE_500325");
}

#[tokio::test]
async fn test_search_no_duplicates() {
    let client = create_test_client().expect("Failed to create client");

    let response = client
        .search(&SearchQuery::new("tcs"))
        .await
        .expect("Search failed");

    let keys = stock_keys(&response);
    let mut unique = keys.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(keys.len(), unique.len());
}

#[tokio::test]
async fn test_search_capacity_bound() {
    let client = create_test_client().expect("Failed to create client");

    let response = client
        .search(&SearchQuery::new("nifty").capacity(2))
        .await
        .expect("Search failed");

    assert!(response.data.len() <= 2);
}

#[tokio::test]
async fn test_search_zero_capacity_rejected() {
    let client = create_test_client().expect("Failed to create client");

    let result = client.search(&SearchQuery::new("reli").capacity(0)).await;

    match result {
        Err(Error::Api { status, code, .. }) => {
            assert_eq!(status, 400);
            assert_eq!(code, "INVALID_REQUEST");
        }
        other => panic!("expected 400, got {:?}", other),
    }
}

#[tokio::test]
async fn test_search_special_characters_empty() {
    let client = create_test_client().expect("Failed to create client");

    let response = client
        .search(&SearchQuery::new("AAPL#"))
        .await
        .expect("Search failed");

    assert!(response.data.is_empty());
}

// ============================================================================
// Legacy Search
// ============================================================================

#[tokio::test]
async fn test_legacy_search() {
    let client = create_test_client().expect("Failed to create client");

    let response = client
        .legacy_search(&LegacySearchQuery {
            search_text: "reliance".to_string(),
            exchange: Some("BSE".to_string()),
            page: 1,
        })
        .await
        .expect("Legacy search failed");

    assert_eq!(stock_keys(&response), vec!["BSE_500325"]);
}

// ============================================================================
// Watchlist
// ============================================================================

#[tokio::test]
async fn test_hydrate_is_stable() {
    let client = create_test_client().expect("Failed to create client");
    let keys = vec!["NSE_11536".to_string(), "MCX_234230".to_string()];

    let first = client.hydrate(&keys).await.expect("Hydrate failed");
    let second = client.hydrate(&keys).await.expect("Hydrate failed");

    assert_eq!(stock_keys(&first), vec!["NSE_11536", "MCX_234230"]);
    assert_eq!(first.data, second.data);
    assert_eq!(first.data[1].segment, "Commodities");
}

// ============================================================================
// Option Chain
// ============================================================================

#[tokio::test]
async fn test_option_chain_window() {
    let client = create_test_client().expect("Failed to create client");

    let expiries = client
        .list_expiries("NIFTY")
        .await
        .expect("Expiries failed");
    assert!(expiries.data.contains(&"2024-04-25".to_string()));

    let window = client
        .strike_window(
            "NIFTY",
            "2024-04-25",
            StrikeWindowQuery {
                price: 22000.0,
                width: 50.0,
            },
        )
        .await
        .expect("Strike window failed");
    assert_eq!(stock_keys(&window), vec!["NFO_43211"]);
}
