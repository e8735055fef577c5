//! Health check endpoint tests.

use scrip_tests::create_test_client;

#[tokio::test]
async fn test_health_check() {
    let client = create_test_client().expect("Failed to create client");

    let health = client.health_check().await.expect("Health check failed");

    assert_eq!(health.status, "healthy");
    assert!(health.cache);
    assert!(!health.version.is_empty());
}
