//! Token refresh interceptor against a scripted backend.

mod common;

use common::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use stockdesk_client::HttpMethod;
use stockdesk_core::{validation, GENERIC_ERROR_MESSAGE, OrderQuery, ProductQuery};

fn products_backend() -> FakeBackend {
    FakeBackend::new()
        .route(
            HttpMethod::Get,
            "/products",
            200,
            json!({
                "message": "Products retrieved",
                "data": { "items": [product_json("p-1")], "total": 1, "page": 1, "limit": 10, "totalPages": 1 }
            }),
        )
        .route(HttpMethod::Get, "/orders", 200, json!({ "message": "ok", "data": [] }))
}

#[tokio::test]
async fn test_auth_failure_refreshes_once_and_replays_once() {
    let backend = Arc::new(products_backend());
    let client = client_for(&backend, session_with(Some(OLD_ACCESS), Some(OLD_REFRESH)));

    let page = client.products().list(&ProductQuery::default()).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, "p-1");

    let refreshes = backend.requests_to("/auth/refresh");
    assert_eq!(refreshes.len(), 1);
    assert_eq!(refreshes[0].bearer, None);
    assert_eq!(json_body(&refreshes[0]), Some(&json!({ "refreshToken": OLD_REFRESH })));

    let bearers: Vec<_> = backend
        .requests_to("/products")
        .into_iter()
        .map(|request| request.bearer)
        .collect();
    assert_eq!(
        bearers,
        vec![Some(OLD_ACCESS.to_string()), Some(NEW_ACCESS.to_string())]
    );

    let session = client.session();
    assert_eq!(session.access_token().unwrap().as_deref(), Some(NEW_ACCESS));
    assert_eq!(session.refresh_token().unwrap().as_deref(), Some(NEW_REFRESH));
}

#[tokio::test]
async fn test_concurrent_failures_share_one_refresh() {
    let backend = Arc::new(products_backend().refresh_delay(Duration::from_millis(50)));
    let client = client_for(&backend, session_with(Some(OLD_ACCESS), Some(OLD_REFRESH)));
    let other = client.clone();

    let (products_api, orders_api) = (client.products(), other.orders());
    let product_query = ProductQuery::default();
    let order_query = OrderQuery::default();
    let (products, orders) = tokio::join!(
        products_api.list(&product_query),
        orders_api.list(&order_query),
    );

    assert!(products.is_ok());
    assert!(orders.is_ok());
    assert_eq!(backend.calls_to("/auth/refresh"), 1);

    let replayed = backend.requests_to("/orders");
    assert_eq!(
        replayed.last().and_then(|request| request.bearer.as_deref()),
        Some(NEW_ACCESS)
    );
}

#[tokio::test]
async fn test_missing_refresh_token_forces_logout() {
    let backend = Arc::new(products_backend());
    let client = client_for(&backend, session_with(Some(OLD_ACCESS), None));
    let logouts = record_logouts(&client);
    client.set_location("/dashboard/orders?status=pending");

    let err = client.orders().list(&OrderQuery::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(backend.calls_to("/auth/refresh"), 0);
    assert_eq!(backend.calls_to("/orders"), 1);

    assert_eq!(
        *logouts.lock().unwrap(),
        vec!["/dashboard/orders?status=pending".to_string()]
    );
    let session = client.session();
    assert_eq!(session.access_token().unwrap(), None);
    assert_eq!(
        session.take_redirect_after_login().unwrap().as_deref(),
        Some("/dashboard/orders?status=pending")
    );
}

#[tokio::test]
async fn test_refresh_failure_forces_logout() {
    let backend = Arc::new(products_backend().refresh_fails());
    let client = client_for(&backend, session_with(Some(OLD_ACCESS), Some(OLD_REFRESH)));
    let logouts = record_logouts(&client);

    let err = client.products().list(&ProductQuery::default()).await.unwrap_err();
    assert_eq!(err.api_message(), Some("Invalid refresh token"));
    assert_eq!(backend.calls_to("/products"), 1);
    assert_eq!(logouts.lock().unwrap().len(), 1);
    assert!(!client.session().has_refresh_token().unwrap());
}

#[tokio::test]
async fn test_waiters_after_failed_refresh_do_not_refresh_again() {
    let backend = Arc::new(
        products_backend()
            .refresh_fails()
            .refresh_delay(Duration::from_millis(50)),
    );
    let client = client_for(&backend, session_with(Some(OLD_ACCESS), Some(OLD_REFRESH)));
    let logouts = record_logouts(&client);

    let (products_api, orders_api) = (client.products(), client.orders());
    let product_query = ProductQuery::default();
    let order_query = OrderQuery::default();
    let (products, orders) = tokio::join!(
        products_api.list(&product_query),
        orders_api.list(&order_query),
    );

    assert!(products.is_err());
    assert!(orders.is_err());
    assert_eq!(backend.calls_to("/auth/refresh"), 1);
    assert_eq!(logouts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_replayed_request_is_not_refreshed_again() {
    let backend = Arc::new(products_backend().rejecting_all());
    let client = client_for(&backend, session_with(Some(OLD_ACCESS), Some(OLD_REFRESH)));
    let logouts = record_logouts(&client);

    let err = client.products().list(&ProductQuery::default()).await.unwrap_err();
    assert!(err.is_auth_failure());
    assert_eq!(backend.calls_to("/auth/refresh"), 1);
    assert_eq!(backend.calls_to("/products"), 2);
    assert!(logouts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_auth_message_triggers_refresh_regardless_of_status() {
    let backend = Arc::new(
        products_backend().rejecting_with(403, "Given token not valid for any token type"),
    );
    let client = client_for(&backend, session_with(Some(OLD_ACCESS), Some(OLD_REFRESH)));

    client.products().list(&ProductQuery::default()).await.unwrap();
    assert_eq!(backend.calls_to("/auth/refresh"), 1);
}

#[tokio::test]
async fn test_forbidden_without_auth_message_is_returned() {
    let backend = Arc::new(products_backend().rejecting_with(403, "Forbidden resource"));
    let client = client_for(&backend, session_with(Some(OLD_ACCESS), Some(OLD_REFRESH)));

    let err = client.products().list(&ProductQuery::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.user_message(), "Forbidden resource");
    assert_eq!(backend.calls_to("/auth/refresh"), 0);
}

#[tokio::test]
async fn test_server_errors_pass_through_without_refresh() {
    let backend = Arc::new(products_backend().route(
        HttpMethod::Get,
        "/products/p-9",
        500,
        json!({ "message": "Internal server error" }),
    ));
    let client = client_for(&backend, session_with(Some(NEW_ACCESS), Some(OLD_REFRESH)));

    let err = client.products().get("p-9").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    assert!(err.is_retryable());
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_public_requests_carry_no_token_and_never_refresh() {
    let backend = Arc::new(products_backend().route(
        HttpMethod::Post,
        "/auth/login",
        401,
        json!({ "message": "Invalid credentials" }),
    ));
    let client = client_for(&backend, session_with(Some(OLD_ACCESS), Some(OLD_REFRESH)));
    let logouts = record_logouts(&client);

    let credentials = validation::login_request("cashier@shop.example", "secret1").unwrap();
    let err = client.auth().login(&credentials).await.unwrap_err();

    assert_eq!(err.user_message(), "Invalid credentials");
    assert_eq!(backend.requests_to("/auth/login")[0].bearer, None);
    assert_eq!(backend.calls_to("/auth/refresh"), 0);
    assert!(logouts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_stores_session() {
    let backend = Arc::new(products_backend().route(
        HttpMethod::Post,
        "/auth/login",
        200,
        auth_body(NEW_ACCESS, NEW_REFRESH),
    ));
    let client = client_for(&backend, session_with(None, None));

    let credentials = validation::login_request("cashier@shop.example", "secret1").unwrap();
    let auth = client.auth().login(&credentials).await.unwrap();
    assert_eq!(auth.access_token, NEW_ACCESS);

    client.products().list(&ProductQuery::default()).await.unwrap();
    assert_eq!(backend.calls_to("/auth/refresh"), 0);

    client.auth().logout().unwrap();
    assert_eq!(client.session().access_token().unwrap(), None);
}

#[tokio::test]
async fn test_explicit_refresh() {
    let backend = Arc::new(products_backend());
    let client = client_for(&backend, session_with(None, Some(OLD_REFRESH)));

    let token = client.auth().refresh().await.unwrap();
    assert_eq!(token, NEW_ACCESS);

    let anonymous = client_for(&backend, session_with(None, None));
    let err = anonymous.auth().refresh().await.unwrap_err();
    assert!(err.is_auth_failure());
}
