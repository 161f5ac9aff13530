//! Integration tests for the admin dashboard against the stub backend.
//!
//! Each test starts its own backend, so request logs never mix.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::json;

use fierce_client::error::MISSING_CREDENTIAL_MESSAGE;
use fierce_client::{AdminDashboard, ClientError};
use fierce_core::{FormField, OrderId, OrderStatus, ProductForm};
use fierce_integration_tests::{Endpoint, StubBackend, TEST_TOKEN};

async fn fill_widget_form(dashboard: &AdminDashboard) {
    dashboard.set_form_field(FormField::Name, "Widget").await;
    dashboard.set_form_field(FormField::Price, "9.99").await;
    dashboard.set_form_field(FormField::Stock, "5").await;
    dashboard
        .set_form_field(FormField::Image, "http://x/y.png")
        .await;
}

// =============================================================================
// Fetching
// =============================================================================

#[tokio::test]
async fn test_fetch_orders_without_token_sends_nothing() {
    let backend = StubBackend::start().await;
    backend.seed_order(1, "Ada", 10.0, "pending");
    let dashboard = AdminDashboard::new(backend.anonymous_client());

    let result = dashboard.fetch_orders().await;

    assert!(matches!(result, Err(ClientError::MissingCredential)));
    assert!(dashboard.orders().await.is_empty());
    assert_eq!(
        dashboard.error().await.as_deref(),
        Some(MISSING_CREDENTIAL_MESSAGE)
    );
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_customer_session_cannot_load_dashboard() {
    let backend = StubBackend::start().await;
    let dashboard = AdminDashboard::new(backend.customer_client());

    let result = dashboard.fetch_products().await;

    assert!(matches!(result, Err(ClientError::MissingCredential)));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_mount_loads_both_lists_with_bearer_token() {
    let backend = StubBackend::start().await;
    backend.seed_product("Widget", 9.99, 5, "http://x/y.png");
    backend.seed_order(7, "Ada", 19.98, "pending");

    let mut dashboard = AdminDashboard::mount(backend.admin_client());
    dashboard.settle().await;
    let state = dashboard.snapshot().await;

    assert_eq!(state.products.len(), 1);
    assert_eq!(state.products[0].name, "Widget");
    assert_eq!(state.products[0].price.to_string(), "9.99");
    assert_eq!(state.orders.len(), 1);
    assert_eq!(state.orders[0].id, OrderId::new(7));
    assert_eq!(state.orders[0].status, OrderStatus::Pending);
    assert!(state.error.is_none());

    let expected = format!("Bearer {TEST_TOKEN}");
    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert!(
        requests
            .iter()
            .all(|request| request.authorization.as_deref() == Some(expected.as_str()))
    );
}

#[tokio::test]
async fn test_failed_fetch_keeps_stale_list() {
    let backend = StubBackend::start().await;
    backend.seed_order(1, "Ada", 10.0, "pending");
    let dashboard = AdminDashboard::new(backend.admin_client());
    dashboard.fetch_orders().await.unwrap();

    backend.fail(
        Endpoint::ListOrders,
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "Database unavailable" }),
    );
    let result = dashboard.fetch_orders().await;

    assert_eq!(
        result.unwrap_err().status(),
        Some(StatusCode::INTERNAL_SERVER_ERROR)
    );
    assert_eq!(dashboard.orders().await.len(), 1);
    assert_eq!(
        dashboard.error().await.as_deref(),
        Some("Database unavailable")
    );
}

#[tokio::test]
async fn test_error_without_message_uses_status_text() {
    let backend = StubBackend::start().await;
    backend.fail(Endpoint::ListProducts, StatusCode::SERVICE_UNAVAILABLE, json!({}));
    let dashboard = AdminDashboard::new(backend.admin_client());

    dashboard.fetch_products().await.unwrap_err();

    assert_eq!(
        dashboard.error().await.as_deref(),
        Some("Service Unavailable")
    );
}

#[tokio::test]
async fn test_missing_envelope_is_empty_list() {
    let backend = StubBackend::start().await;
    backend.fail(Endpoint::ListOrders, StatusCode::OK, json!({}));
    let dashboard = AdminDashboard::new(backend.admin_client());

    dashboard.fetch_orders().await.unwrap();

    assert!(dashboard.orders().await.is_empty());
    assert!(dashboard.error().await.is_none());
}

// =============================================================================
// Adding products
// =============================================================================

#[tokio::test]
async fn test_add_product_resets_form_and_reloads_once() {
    let backend = StubBackend::start().await;
    let dashboard = AdminDashboard::new(backend.admin_client());
    fill_widget_form(&dashboard).await;

    dashboard.submit_product_form().await.unwrap();

    assert_eq!(dashboard.form().await, ProductForm::default());
    assert!(dashboard.error().await.is_none());
    assert_eq!(backend.count(&Method::POST, "/admin/products"), 1);
    assert_eq!(backend.count(&Method::GET, "/admin/products"), 1);

    let products = dashboard.products().await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Widget");
    assert_eq!(products[0].stock, 5);
    assert_eq!(products[0].image, "http://x/y.png");
}

#[tokio::test]
async fn test_add_product_clears_previous_error() {
    let backend = StubBackend::start().await;
    backend.fail(Endpoint::ListOrders, StatusCode::BAD_GATEWAY, json!({}));
    let dashboard = AdminDashboard::new(backend.admin_client());
    dashboard.fetch_orders().await.unwrap_err();
    assert!(dashboard.error().await.is_some());

    fill_widget_form(&dashboard).await;
    dashboard.submit_product_form().await.unwrap();

    assert!(dashboard.error().await.is_none());
}

#[tokio::test]
async fn test_add_product_failure_keeps_form() {
    let backend = StubBackend::start().await;
    backend.fail(
        Endpoint::CreateProduct,
        StatusCode::BAD_REQUEST,
        json!({ "message": "Product name already exists" }),
    );
    let dashboard = AdminDashboard::new(backend.admin_client());
    fill_widget_form(&dashboard).await;
    let typed = dashboard.form().await;

    let result = dashboard.submit_product_form().await;

    assert!(matches!(result, Err(ClientError::Api { .. })));
    assert_eq!(dashboard.form().await, typed);
    assert_eq!(
        dashboard.error().await.as_deref(),
        Some("Product name already exists")
    );
    assert_eq!(backend.count(&Method::GET, "/admin/products"), 0);
}

#[tokio::test]
async fn test_invalid_form_is_not_sent() {
    let backend = StubBackend::start().await;
    let dashboard = AdminDashboard::new(backend.admin_client());
    fill_widget_form(&dashboard).await;
    dashboard.set_form_field(FormField::Price, "cheap").await;

    let result = dashboard.submit_product_form().await;

    assert!(matches!(result, Err(ClientError::Form(_))));
    assert!(dashboard.error().await.is_some());
    assert_eq!(dashboard.form().await.price, "cheap");
    assert!(backend.requests().is_empty());
}

// =============================================================================
// Approving orders
// =============================================================================

#[tokio::test]
async fn test_approve_order_updates_only_that_order() {
    let backend = StubBackend::start().await;
    backend.seed_order(41, "Ada", 10.0, "pending");
    backend.seed_order(42, "Grace", 20.0, "pending");
    let mut dashboard = AdminDashboard::mount(backend.admin_client());
    dashboard.settle().await;

    dashboard.approve_order(OrderId::new(42)).await.unwrap();

    let orders = dashboard.orders().await;
    let status_of = |id: i64| {
        orders
            .iter()
            .find(|order| order.id == OrderId::new(id))
            .map(|order| order.status)
    };
    assert_eq!(status_of(42), Some(OrderStatus::Approved));
    assert_eq!(status_of(41), Some(OrderStatus::Pending));

    let approve = backend
        .requests()
        .into_iter()
        .find(|request| request.method == Method::PUT)
        .unwrap();
    assert_eq!(approve.path, "/admin/orders/42/approve");
    assert_eq!(backend.count(&Method::GET, "/admin/orders"), 2);
}

#[tokio::test]
async fn test_approve_order_not_found_leaves_orders_unchanged() {
    let backend = StubBackend::start().await;
    backend.seed_order(42, "Grace", 20.0, "pending");
    let dashboard = AdminDashboard::new(backend.admin_client());
    dashboard.fetch_orders().await.unwrap();
    backend.fail(
        Endpoint::ApproveOrder,
        StatusCode::NOT_FOUND,
        json!({ "message": "Order not found" }),
    );

    let result = dashboard.approve_order(OrderId::new(42)).await;

    assert_eq!(result.unwrap_err().status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(dashboard.error().await.as_deref(), Some("Order not found"));
    assert_eq!(dashboard.orders().await[0].status, OrderStatus::Pending);
    assert_eq!(backend.order_status(42).as_deref(), Some("pending"));
    assert_eq!(backend.count(&Method::GET, "/admin/orders"), 1);
}

#[tokio::test]
async fn test_approve_unknown_order_reports_backend_message() {
    let backend = StubBackend::start().await;
    let dashboard = AdminDashboard::new(backend.admin_client());

    dashboard.approve_order(OrderId::new(999)).await.unwrap_err();

    assert_eq!(dashboard.error().await.as_deref(), Some("Order not found"));
}

// =============================================================================
// Transport failures and logout
// =============================================================================

#[tokio::test]
async fn test_unreachable_backend_reports_operation_message() {
    let backend = StubBackend::start().await;
    let api = backend.admin_client();
    drop(backend);
    // Give the aborted server task a moment to release the port
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let dashboard = AdminDashboard::new(api);

    let result = dashboard.fetch_orders().await;

    assert!(matches!(result, Err(ClientError::Transport(_))));
    assert_eq!(
        dashboard.error().await.as_deref(),
        Some("Error occurred while fetching orders")
    );
}

#[tokio::test]
async fn test_logout_clears_session_and_blocks_further_calls() {
    let backend = StubBackend::start().await;
    let dashboard = AdminDashboard::new(backend.admin_client());

    let next = dashboard.logout().unwrap();
    let result = dashboard.fetch_orders().await;

    assert_eq!(next, fierce_core::Route::Login);
    assert!(matches!(result, Err(ClientError::MissingCredential)));
    assert!(backend.requests().is_empty());
}
