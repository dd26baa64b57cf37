//! HTTP-level tests: drive the router with in-process requests and assert
//! the status codes and JSON envelopes the API promises.

mod support;

use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use wallet_topup_service::{gateway::simulated::FixedProviderGateway, router};

use support::{TestApp, test_app};

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = router(app.state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = test_app(0, 10_000, Arc::new(FixedProviderGateway::success())).await;
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn deposit_completes_and_shows_in_balance() {
    let app = test_app(0, 10_000, Arc::new(FixedProviderGateway::success())).await;

    let (status, body) = send(
        &app,
        post(
            "/api/v1/deposits",
            json!({"user_id": app.user_id, "amount_cents": 100_000}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "deposit");
    assert_eq!(body["status"], "completed");
    assert_eq!(body["amount_cents"], 100_000);
    assert_eq!(body["payment_method"], "external_gateway");

    let (status, body) = send(&app, get(&format!("/api/v1/users/{}/balance", app.user_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance_cents"], 100_000);
}

#[tokio::test]
async fn wallet_topup_round_trips_through_the_api() {
    let app = test_app(100_000, 10_000, Arc::new(FixedProviderGateway::success())).await;

    let (status, body) = send(
        &app,
        post(
            "/api/v1/topups",
            json!({
                "user_id": app.user_id,
                "catalog_item_id": app.item_id,
                "target_identifier": "+15550001234",
                "payment_method": "wallet"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "topup");
    assert_eq!(body["status"], "completed");
    assert_eq!(body["amount_cents"], 10_000);
    assert_eq!(body["gateway_reference"], "prv_fixed_ok");

    // The transaction is retrievable by id.
    let id = body["id"].as_str().unwrap();
    let (status, fetched) = send(&app, get(&format!("/api/v1/transactions/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], body["id"]);

    let (_, balance) = send(&app, get(&format!("/api/v1/users/{}/balance", app.user_id))).await;
    assert_eq!(balance["balance_cents"], 90_000);
}

#[tokio::test]
async fn uncovered_wallet_topup_is_rejected_with_422() {
    let app = test_app(5_000, 10_000, Arc::new(FixedProviderGateway::success())).await;

    let (status, body) = send(
        &app,
        post(
            "/api/v1/topups",
            json!({
                "user_id": app.user_id,
                "catalog_item_id": app.item_id,
                "target_identifier": "+15550001234",
                "payment_method": "wallet"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "insufficient_balance");

    // Balance untouched, no transaction row created.
    let (_, balance) = send(&app, get(&format!("/api/v1/users/{}/balance", app.user_id))).await;
    assert_eq!(balance["balance_cents"], 5_000);
    let (_, history) = send(
        &app,
        get(&format!("/api/v1/users/{}/transactions", app.user_id)),
    )
    .await;
    assert_eq!(history.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unknown_item_maps_to_404() {
    let app = test_app(100_000, 10_000, Arc::new(FixedProviderGateway::success())).await;

    let (status, body) = send(
        &app,
        post(
            "/api/v1/topups",
            json!({
                "user_id": app.user_id,
                "catalog_item_id": Uuid::new_v4(),
                "target_identifier": "+15550001234",
                "payment_method": "wallet"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "item_not_found");
}

#[tokio::test]
async fn non_positive_deposit_maps_to_400() {
    let app = test_app(0, 10_000, Arc::new(FixedProviderGateway::success())).await;

    let (status, body) = send(
        &app,
        post(
            "/api/v1/deposits",
            json!({"user_id": app.user_id, "amount_cents": 0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_amount");
}

#[tokio::test]
async fn unknown_user_maps_to_404() {
    let app = test_app(0, 10_000, Arc::new(FixedProviderGateway::success())).await;

    let (status, body) = send(
        &app,
        get(&format!("/api/v1/users/{}/balance", Uuid::new_v4())),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "user_not_found");
}

#[tokio::test]
async fn failed_topup_is_returned_not_raised() {
    let app = test_app(100_000, 10_000, Arc::new(FixedProviderGateway::failure())).await;

    let (status, body) = send(
        &app,
        post(
            "/api/v1/topups",
            json!({
                "user_id": app.user_id,
                "catalog_item_id": app.item_id,
                "target_identifier": "+15550001234",
                "payment_method": "wallet"
            }),
        ),
    )
    .await;
    // A provider decline is a business outcome, not an HTTP error.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["gateway_reference"], "prv_fixed_err");

    let (_, balance) = send(&app, get(&format!("/api/v1/users/{}/balance", app.user_id))).await;
    assert_eq!(balance["balance_cents"], 100_000);
}

#[tokio::test]
async fn history_pages_newest_first() {
    let app = test_app(0, 10_000, Arc::new(FixedProviderGateway::success())).await;

    for amount in [1_000, 2_000, 3_000] {
        let (status, _) = send(
            &app,
            post(
                "/api/v1/deposits",
                json!({"user_id": app.user_id, "amount_cents": amount}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(
        &app,
        get(&format!(
            "/api/v1/users/{}/transactions?limit=2&offset=0",
            app.user_id
        )),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let page = body.as_array().unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0]["amount_cents"], 3_000);
    assert_eq!(page[1]["amount_cents"], 2_000);

    let (_, body) = send(
        &app,
        get(&format!(
            "/api/v1/users/{}/transactions?limit=2&offset=2",
            app.user_id
        )),
    )
    .await;
    let page = body.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["amount_cents"], 1_000);
}
