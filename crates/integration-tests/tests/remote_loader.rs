//! The HTTP loader and normalization against the mock API.

use vitrine_catalog::config::CatalogConfig;
use vitrine_catalog::models::{Product, User};
use vitrine_catalog::remote::{ApiClient, FetchFailure, FetchOutcome, RemoteSource};
use vitrine_integration_tests::{Mode, MockApi};

fn client(api: &MockApi) -> ApiClient {
    let dir = std::env::temp_dir();
    let config: CatalogConfig = api.config(&dir).expect("Failed to build config");
    ApiClient::new(&config.remote).expect("Failed to build client")
}

#[tokio::test]
async fn test_mock_serves_envelopes() {
    let api = MockApi::with_fixtures().await;
    let body: serde_json::Value = reqwest::get(api.users_url())
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Body is not JSON");

    assert_eq!(body["users"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_users_are_normalized() {
    let api = MockApi::with_fixtures().await;
    let users = client(&api).fetch_users().await.into_records();

    assert_eq!(users.len(), 3);
    assert_eq!(users[0].full_name(), "Emily Johnson");
    assert_eq!(users[0].age, Some(28.0));
    assert_eq!(users[1].image, "https://i.pravatar.cc/150?img=2");
    assert_eq!(users[2].full_name(), "Nome Sobrenome");
    assert_eq!(users[2].email, "");
    assert_eq!(users[2].age, None);
}

#[tokio::test]
async fn test_remote_source_dispatches_by_record_type() {
    let api = MockApi::with_fixtures().await;
    let client = client(&api);

    let users = RemoteSource::<User>::fetch(&client).await;
    let products = RemoteSource::<Product>::fetch(&client).await;

    assert_eq!(users.len(), 3);
    assert_eq!(products.len(), 6);
    assert_eq!(api.user_hits(), 1);
    assert_eq!(api.product_hits(), 1);
}

#[tokio::test]
async fn test_empty_page_is_not_a_failure() {
    let api = MockApi::with_fixtures().await;
    api.set_products(serde_json::json!([]));

    let outcome = client(&api).fetch_products().await;

    assert!(outcome.failure().is_none());
    assert!(outcome.is_empty());
}

#[tokio::test]
async fn test_missing_list_is_an_empty_page() {
    let api = MockApi::with_fixtures().await;
    api.set_mode(Mode::MissingList);
    let client = client(&api);

    let users = client.fetch_users().await;
    let products = client.fetch_products().await;

    assert!(matches!(users, FetchOutcome::Fetched(ref records) if records.is_empty()));
    assert!(matches!(products, FetchOutcome::Fetched(ref records) if records.is_empty()));
    assert_eq!(api.user_hits(), 1);
    assert_eq!(api.product_hits(), 1);
}

#[tokio::test]
async fn test_malformed_entity_keeps_the_rest_of_the_page() {
    let api = MockApi::with_fixtures().await;
    api.set_users(serde_json::json!([
        { "id": 1, "firstName": "Emily" },
        { "id": "u-2", "age": "35" },
    ]));

    let outcome = client(&api).fetch_users().await;

    assert!(outcome.failure().is_none());
    let users = outcome.into_records();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].age, Some(35.0));
}

#[tokio::test]
async fn test_failures_are_classified() {
    let api = MockApi::with_fixtures().await;
    let client = client(&api);

    api.set_mode(Mode::ServerError);
    assert_eq!(
        client.fetch_users().await.failure(),
        Some(&FetchFailure::Status(500))
    );

    api.set_mode(Mode::Garbage);
    assert!(matches!(
        client.fetch_products().await.failure(),
        Some(FetchFailure::Parse(_))
    ));
}
