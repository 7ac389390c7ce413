//! E2E tests for the marketplace routes using smart-client
//!
//! Every test starts the real router on an ephemeral port, backed by the
//! in-memory store, and talks to it over HTTP through `SmartClient` so the
//! client stays in sync with the API.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use smart_api::{create_router, AppState, AuthPolicy};
use smart_client::testing::TestServer;
use smart_client::{CreateUserOutcome, SmartClientError};
use smart_core::{Collection, MemoryStore};

const MISSING_ID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

async fn start(policy: AuthPolicy) -> (TestServer, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone()).with_auth_policy(policy);
    let server = TestServer::start(create_router(state)).await.unwrap();
    (server, store)
}

fn id_of(ack_id: &Value) -> String {
    ack_id.as_str().expect("inserted id is a hex string").to_string()
}

// =============================================================================
// Liveness
// =============================================================================

#[tokio::test]
async fn root_and_health() {
    let (server, _store) = start(AuthPolicy::Permissive).await;

    assert_eq!(server.client.root().await.unwrap(), "Smart server is running");
    assert_eq!(server.client.health().await.unwrap(), "OK");
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn insert_then_fetch_returns_fields_and_id() {
    let (server, _store) = start(AuthPolicy::Permissive).await;
    let client = &server.client;

    let ack = client
        .create_product(&json!({"name": "Lamp", "price": 12, "email": "s@x.com"}))
        .await
        .unwrap();
    assert!(ack.acknowledged);
    let id = id_of(&ack.inserted_id);

    let product = client.get_product(&id).await.unwrap().unwrap();
    assert_eq!(
        Value::Object(product),
        json!({"name": "Lamp", "price": 12, "email": "s@x.com", "_id": id})
    );
}

#[tokio::test]
async fn unknown_product_is_null() {
    let (server, _store) = start(AuthPolicy::Permissive).await;

    assert_eq!(server.client.get_product(MISSING_ID).await.unwrap(), None);
}

#[tokio::test]
async fn products_filter_by_seller_email() {
    let (server, _store) = start(AuthPolicy::Permissive).await;
    let client = &server.client;

    client
        .create_product(&json!({"name": "A", "email": "a@x.com"}))
        .await
        .unwrap();
    client
        .create_product(&json!({"name": "B", "email": "b@x.com"}))
        .await
        .unwrap();

    let mine = client.list_products(Some("a@x.com")).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["name"], json!("A"));

    assert_eq!(client.list_products(None).await.unwrap().len(), 2);
    // An empty email means no filter
    assert_eq!(client.list_products(Some("")).await.unwrap().len(), 2);
}

#[tokio::test]
async fn latest_products_are_newest_nine() {
    let (server, _store) = start(AuthPolicy::Permissive).await;
    let client = &server.client;

    for day in 1..=12 {
        let created_at = format!("2024-01-{:02}T00:00:00Z", day);
        client
            .create_product(&json!({"name": format!("p{}", day), "created_at": created_at}))
            .await
            .unwrap();
    }

    let latest = client.latest_products().await.unwrap();
    assert_eq!(latest.len(), 9);
    assert_eq!(latest[0]["name"], json!("p12"));
    assert_eq!(latest[8]["name"], json!("p4"));

    let stamps: Vec<&str> = latest
        .iter()
        .map(|p| p["created_at"].as_str().unwrap())
        .collect();
    assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn patch_sets_only_name_and_price() {
    let (server, _store) = start(AuthPolicy::Permissive).await;
    let client = &server.client;

    let ack = client
        .create_product(&json!({"name": "Old", "price": 1, "email": "s@x.com"}))
        .await
        .unwrap();
    let id = id_of(&ack.inserted_id);

    let update = client
        .update_product(&id, &json!({"name": "New", "price": 2, "email": "evil@x.com", "extra": true}))
        .await
        .unwrap();
    assert_eq!(update.matched_count, 1);
    assert_eq!(update.modified_count, 1);

    let product = client.get_product(&id).await.unwrap().unwrap();
    assert_eq!(product["name"], json!("New"));
    assert_eq!(product["price"], json!(2));
    assert_eq!(product["email"], json!("s@x.com"));
    assert!(product.get("extra").is_none());
}

#[tokio::test]
async fn patch_writes_null_for_absent_fields() {
    let (server, _store) = start(AuthPolicy::Permissive).await;
    let client = &server.client;

    let ack = client
        .create_product(&json!({"name": "Old", "price": 1}))
        .await
        .unwrap();
    let id = id_of(&ack.inserted_id);

    client
        .update_product(&id, &json!({"name": "New"}))
        .await
        .unwrap();

    let product = client.get_product(&id).await.unwrap().unwrap();
    assert_eq!(product["name"], json!("New"));
    assert_eq!(product["price"], Value::Null);
}

#[tokio::test]
async fn patch_and_delete_unknown_id_report_zero() {
    let (server, _store) = start(AuthPolicy::Permissive).await;
    let client = &server.client;

    let update = client
        .update_product(MISSING_ID, &json!({"name": "x", "price": 1}))
        .await
        .unwrap();
    assert_eq!(update.matched_count, 0);
    assert_eq!(update.modified_count, 0);

    assert_eq!(client.delete_product(MISSING_ID).await.unwrap().deleted_count, 0);
    assert_eq!(client.delete_bid(MISSING_ID).await.unwrap().deleted_count, 0);
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let (server, _store) = start(AuthPolicy::Permissive).await;
    let client = &server.client;

    let err = client.get_product("not-an-id").await.unwrap_err();
    match err {
        SmartClientError::BadRequest(message) => {
            assert_eq!(message, "Invalid identifier: not-an-id")
        }
        other => panic!("expected 400, got {:?}", other),
    }

    assert!(matches!(
        client.update_product("123", &json!({"name": "x"})).await,
        Err(SmartClientError::BadRequest(_))
    ));
    assert!(matches!(
        client.delete_product("zz").await,
        Err(SmartClientError::BadRequest(_))
    ));
    assert!(matches!(
        client.delete_bid("zz").await,
        Err(SmartClientError::BadRequest(_))
    ));
}

#[tokio::test]
async fn non_object_bodies_are_rejected() {
    let (server, store) = start(AuthPolicy::Permissive).await;
    let client = &server.client;

    assert!(matches!(
        client.create_product(&json!([1, 2, 3])).await,
        Err(SmartClientError::BadRequest(_))
    ));
    assert!(matches!(
        client.create_bid(&json!("bid")).await,
        Err(SmartClientError::BadRequest(_))
    ));
    assert_eq!(store.count(Collection::Products), 0);
    assert_eq!(store.count(Collection::Bids), 0);
}

#[tokio::test]
async fn missing_content_type_is_unsupported_media_type() {
    let (server, _store) = start(AuthPolicy::Permissive).await;

    let response = server
        .client
        .http_client()
        .post(server.url("/products"))
        .body(r#"{"name": "x"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 415);
}

#[tokio::test]
async fn malformed_query_and_path_use_error_body() {
    let (server, _store) = start(AuthPolicy::Permissive).await;
    let http = server.client.http_client();

    for path in ["/products?email=a&email=b", "/bids?email=a&email=b", "/products/%FF"] {
        let response = http.get(server.url(path)).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 400, "{}", path);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], json!("bad_request"), "{}", path);
        assert!(body["message"].is_string());
    }
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn duplicate_user_is_stored_once() {
    let (server, store) = start(AuthPolicy::Permissive).await;
    let client = &server.client;
    let user = json!({"email": "a@x.com", "name": "Ann"});

    let first = client.create_user(&user).await.unwrap();
    assert!(first.is_inserted());

    let second = client.create_user(&user).await.unwrap();
    match second {
        CreateUserOutcome::AlreadyExists(response) => assert_eq!(
            response.message,
            "User already exists. No need to insert again."
        ),
        other => panic!("expected existence message, got {:?}", other),
    }

    assert_eq!(store.count(Collection::Users), 1);
}

#[tokio::test]
async fn user_without_email_is_rejected() {
    let (server, store) = start(AuthPolicy::Permissive).await;

    let err = server
        .client
        .create_user(&json!({"name": "Ann"}))
        .await
        .unwrap_err();
    assert!(matches!(err, SmartClientError::BadRequest(ref m) if m == "email is required"));
    assert_eq!(store.count(Collection::Users), 0);
}

// =============================================================================
// Bids
// =============================================================================

#[tokio::test]
async fn product_bids_are_filtered_and_highest_first() {
    let (server, _store) = start(AuthPolicy::Permissive).await;
    let client = &server.client;

    for (product, price) in [("p1", 10), ("p2", 99), ("p1", 30), ("p1", 20)] {
        client
            .create_bid(&json!({"product": product, "bid_price": price}))
            .await
            .unwrap();
    }

    let bids = client.list_product_bids("p1").await.unwrap();
    let prices: Vec<i64> = bids
        .iter()
        .map(|b| {
            assert_eq!(b["product"], json!("p1"));
            b["bid_price"].as_i64().unwrap()
        })
        .collect();
    assert_eq!(prices, vec![30, 20, 10]);

    assert!(client.list_product_bids("none").await.unwrap().is_empty());
}

#[tokio::test]
async fn product_bids_accept_reserved_characters_in_product() {
    let (server, _store) = start(AuthPolicy::Permissive).await;
    let client = &server.client;

    let products = ["a/b", "x?y", "sku#1", "50%off", "plain"];
    for (price, product) in products.iter().enumerate() {
        client
            .create_bid(&json!({"product": product, "bid_price": price}))
            .await
            .unwrap();
    }

    for (price, product) in products.iter().enumerate() {
        let bids = client.list_product_bids(product).await.unwrap();
        assert_eq!(bids.len(), 1, "bids for {:?}", product);
        assert_eq!(bids[0]["product"], json!(product));
        assert_eq!(bids[0]["bid_price"], json!(price));
    }
}

#[tokio::test]
async fn bids_filter_by_buyer_email() {
    let (server, _store) = start(AuthPolicy::Permissive).await;
    let client = &server.client;

    client
        .create_bid(&json!({"buyer_email": "b@x.com", "bid_price": 5}))
        .await
        .unwrap();
    client
        .create_bid(&json!({"buyer_email": "c@x.com", "bid_price": 6}))
        .await
        .unwrap();

    let mine = client.list_bids(Some("b@x.com")).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["bid_price"], json!(5));
    assert_eq!(client.list_bids(Some("")).await.unwrap().len(), 2);
}

#[tokio::test]
async fn widget_listing_and_bid_scenario() {
    let (server, _store) = start(AuthPolicy::Permissive).await;
    let client = &server.client;

    let ack = client
        .create_product(&json!({"name": "Widget", "price": 5, "email": "a@x.com"}))
        .await
        .unwrap();
    let product_id = id_of(&ack.inserted_id);

    let listed = client.list_products(Some("a@x.com")).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], json!("Widget"));

    let bid = client
        .create_bid(&json!({"product": product_id, "buyer_email": "b@x.com", "bid_price": 7}))
        .await
        .unwrap();

    let bids = client.list_product_bids(&product_id).await.unwrap();
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0]["bid_price"], json!(7));

    let deleted = client.delete_bid(&id_of(&bid.inserted_id)).await.unwrap();
    assert_eq!(deleted.deleted_count, 1);
    assert!(client.list_product_bids(&product_id).await.unwrap().is_empty());

    let deleted = client.delete_product(&product_id).await.unwrap();
    assert_eq!(deleted.deleted_count, 1);
    assert_eq!(client.get_product(&product_id).await.unwrap(), None);
}

// =============================================================================
// Token gate
// =============================================================================

#[tokio::test]
async fn permissive_gate_lets_requests_without_token_through() {
    let (server, _store) = start(AuthPolicy::Permissive).await;

    assert!(server.client.list_bids(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn enforcing_gate_requires_authorization_header() {
    let (server, _store) = start(AuthPolicy::Enforce).await;

    let err = server.client.list_bids(None).await.unwrap_err();
    assert!(matches!(err, SmartClientError::Unauthorized(ref m) if m == "unauthorized access"));

    let authorized = server.client_with_token("anything").unwrap();
    assert!(authorized.list_bids(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn enforcing_gate_covers_only_bid_listing() {
    let (server, _store) = start(AuthPolicy::Enforce).await;
    let client = &server.client;

    let ack = client
        .create_bid(&json!({"product": "p1", "bid_price": 1}))
        .await
        .unwrap();
    assert_eq!(client.list_product_bids("p1").await.unwrap().len(), 1);
    assert_eq!(
        client.delete_bid(&id_of(&ack.inserted_id)).await.unwrap().deleted_count,
        1
    );
    assert!(client.list_products(None).await.unwrap().is_empty());
}

// =============================================================================
// Store failures
// =============================================================================

#[tokio::test]
async fn store_outage_is_service_unavailable_without_detail() {
    let (server, store) = start(AuthPolicy::Permissive).await;
    store.set_available(false);

    let err = server.client.list_products(None).await.unwrap_err();
    match err {
        SmartClientError::ServerError { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "Document store unavailable");
        }
        other => panic!("expected 503, got {:?}", other),
    }

    assert_eq!(
        server.client.health().await.unwrap_err().status(),
        Some(503)
    );

    store.set_available(true);
    assert_eq!(server.client.health().await.unwrap(), "OK");
}
