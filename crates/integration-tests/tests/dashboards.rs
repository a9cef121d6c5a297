//! Integration tests for the store owner and delivery partner dashboards.

use axum::http::StatusCode;
use localazy_core::{OrderId, OrderStatus, ProductId};
use localazy_integration_tests::{TestApp, TestClient};

// =============================================================================
// Helpers
// =============================================================================

async fn login(app: &TestApp, kind: &str, email: &str) -> TestClient {
    let mut client = app.client();
    let resp = client
        .post_form(
            &format!("/auth/{kind}/login"),
            &[("email", email), ("password", "secret123")],
        )
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER, "{kind} login failed");
    client
}

/// Place an order for one item from the grocery store as a fresh customer.
async fn place_order(app: &TestApp) -> OrderId {
    let mut customer = app.client();
    customer
        .post_form("/cart/add", &[("shop_id", "1"), ("item_id", "103")])
        .await;
    let resp = customer
        .post_form(
            "/checkout",
            &[
                ("name", "Asha Rao"),
                ("phone", "9876543210"),
                ("address", "12 MG Road, Bangalore"),
            ],
        )
        .await;
    assert_eq!(resp.location(), Some("/profile"));

    let book = app.state().orders().read().await;
    book.all().last().map(|order| order.id).unwrap_or_else(|| panic!("no order placed"))
}

async fn status_of(app: &TestApp, id: OrderId) -> OrderStatus {
    app.state()
        .orders()
        .read()
        .await
        .get(id)
        .map(|order| order.status)
        .unwrap_or_else(|| panic!("order {id} missing"))
}

// =============================================================================
// Access
// =============================================================================

#[tokio::test]
async fn test_dashboards_require_login() {
    let app = TestApp::new();
    let mut client = app.client();

    let resp = client.get("/store/dashboard").await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/auth/store"));

    let resp = client.get("/delivery/orders").await;
    assert_eq!(resp.location(), Some("/auth/delivery"));
}

#[tokio::test]
async fn test_customer_cannot_open_store_dashboard() {
    let app = TestApp::new();
    let mut customer = login(&app, "customer", "asha@example.com").await;

    let resp = customer.get("/store/dashboard").await;
    assert_eq!(resp.location(), Some("/auth/store"));
}

#[tokio::test]
async fn test_login_lands_on_kind_home() {
    let app = TestApp::new();
    let mut client = app.client();

    let resp = client
        .post_form(
            "/auth/store/login",
            &[("email", "owner@example.com"), ("password", "secret123")],
        )
        .await;
    assert_eq!(resp.location(), Some("/store/dashboard"));

    let resp = client
        .post_form(
            "/auth/delivery/login",
            &[("email", "not-an-email"), ("password", "secret123")],
        )
        .await;
    assert_eq!(resp.location(), Some("/auth/delivery"));
}

// =============================================================================
// Store owner
// =============================================================================

#[tokio::test]
async fn test_store_setup_then_dashboard() {
    let app = TestApp::new();
    let mut owner = login(&app, "store", "owner@example.com").await;

    let resp = owner
        .post_form(
            "/store/setup",
            &[
                ("store_name", "Corner Grocer"),
                ("email", "owner@example.com"),
                ("contact", "9876543210"),
                ("tagline", "Fresh every day"),
            ],
        )
        .await;
    assert_eq!(resp.location(), Some("/store/dashboard"));

    let resp = owner.get("/store/dashboard").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Corner Grocer"));
    assert!(resp.body.contains("Fresh every day"));
}

#[tokio::test]
async fn test_store_manages_products() {
    let app = TestApp::new();
    let mut owner = login(&app, "store", "owner@example.com").await;

    let resp = owner
        .post_form(
            "/store/products",
            &[("name", "Green Tea"), ("price", "6.50"), ("category", "Beverages"), ("in_stock", "on")],
        )
        .await;
    assert_eq!(resp.location(), Some("/store/dashboard?view=manage"));

    let resp = owner
        .post_form("/store/products", &[("name", ""), ("price", "0"), ("category", "")])
        .await;
    assert_eq!(resp.location(), Some("/store/dashboard?view=add"));

    {
        let inventory = app.state().inventory().read().await;
        assert_eq!(inventory.products().len(), 4);
        assert_eq!(inventory.in_stock_count(), 3);
    }

    let resp = owner.post_form("/store/products/3/toggle-stock", &[]).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(app.state().inventory().read().await.in_stock_count(), 4);

    let resp = owner.post_form("/store/products/99/toggle-stock", &[]).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    owner.post_form("/store/products/1/select", &[]).await;
    owner.post_form("/store/products/4/select", &[]).await;
    let resp = owner.get("/store/dashboard?view=manage").await;
    assert!(resp.body.contains("Green Tea"));

    owner.post_form("/store/products/delete", &[]).await;
    {
        let inventory = app.state().inventory().read().await;
        assert_eq!(inventory.products().len(), 2);
        assert!(inventory.get(ProductId::new(1)).is_none());
        assert!(inventory.get(ProductId::new(4)).is_none());
    }

    let resp = owner.get("/store/dashboard?view=manage&q=bread").await;
    assert!(resp.body.contains("Fresh Bread"));
    assert!(!resp.body.contains("Organic Tea"));
}

#[tokio::test]
async fn test_store_accepts_and_prepares_orders() {
    let app = TestApp::new();
    let order_id = place_order(&app).await;
    let mut owner = login(&app, "store", "owner@example.com").await;

    let resp = owner.get("/store/dashboard?view=orders").await;
    assert!(resp.body.contains(&order_id.to_string()));

    let resp = owner.get("/store/dashboard?view=orders&shop=2").await;
    assert!(!resp.body.contains(&order_id.to_string()));

    let resp = owner
        .post_form(&format!("/store/orders/{order_id}/accept"), &[])
        .await;
    assert_eq!(resp.location(), Some("/store/dashboard?view=orders"));
    assert_eq!(status_of(&app, order_id).await, OrderStatus::Accepted);

    owner
        .post_form(&format!("/store/orders/{order_id}/prepare"), &[])
        .await;
    assert_eq!(status_of(&app, order_id).await, OrderStatus::Preparing);

    // Statuses only move forward
    let resp = owner
        .post_form(&format!("/store/orders/{order_id}/accept"), &[])
        .await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
}

// =============================================================================
// Delivery partner
// =============================================================================

#[tokio::test]
async fn test_courier_setup_with_id_proof() {
    let app = TestApp::new();
    let mut courier = login(&app, "delivery", "ravi@example.com").await;

    let fields = [
        ("name", "Ravi Kumar"),
        ("gender", "male"),
        ("phone", "9123456780"),
        ("address", "45 Residency Road, Bangalore"),
    ];

    let resp = courier
        .post_multipart("/delivery/setup", &fields, Some(("id_proof", "id.txt", "text/plain", b"hello")))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = courier.post_multipart("/delivery/setup", &fields, None).await;
    assert_eq!(resp.location(), Some("/delivery/setup"));

    let png = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
    let resp = courier
        .post_multipart("/delivery/setup", &fields, Some(("id_proof", "id.png", "image/png", &png)))
        .await;
    assert_eq!(resp.location(), Some("/delivery/orders"));

    let resp = courier.get("/delivery/setup").await;
    assert!(resp.body.contains("Ravi Kumar"));
}

#[tokio::test]
async fn test_courier_claim_and_deliver() {
    let app = TestApp::new();
    let order_id = place_order(&app).await;
    let mut ravi = login(&app, "delivery", "ravi@example.com").await;
    let mut meena = login(&app, "delivery", "meena@example.com").await;

    let resp = ravi.get("/delivery/orders").await;
    assert!(resp.body.contains(&order_id.to_string()));

    let resp = ravi
        .post_form(&format!("/delivery/orders/{order_id}/accept"), &[])
        .await;
    assert_eq!(resp.location(), Some("/delivery/orders?tab=mine"));
    assert_eq!(status_of(&app, order_id).await, OrderStatus::Accepted);

    // Claimed orders leave the available list
    let resp = meena.get("/delivery/orders").await;
    assert!(!resp.body.contains(&order_id.to_string()));

    let resp = meena
        .post_form(&format!("/delivery/orders/{order_id}/accept"), &[])
        .await;
    assert_eq!(resp.status, StatusCode::CONFLICT);

    let resp = meena
        .post_form(&format!("/delivery/orders/{order_id}/start"), &[])
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    // Cannot complete before starting
    let resp = ravi
        .post_form(&format!("/delivery/orders/{order_id}/complete"), &[])
        .await;
    assert_eq!(resp.status, StatusCode::CONFLICT);

    ravi.post_form(&format!("/delivery/orders/{order_id}/start"), &[])
        .await;
    assert_eq!(status_of(&app, order_id).await, OrderStatus::OutForDelivery);

    ravi.post_form(&format!("/delivery/orders/{order_id}/complete"), &[])
        .await;
    assert_eq!(status_of(&app, order_id).await, OrderStatus::Delivered);

    let resp = ravi.get("/delivery/orders?tab=mine").await;
    assert!(resp.body.contains(&order_id.to_string()));
    assert!(resp.body.contains("Order") && resp.body.contains("delivered successfully"));
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let app = TestApp::new();
    let mut courier = login(&app, "delivery", "ravi@example.com").await;

    let resp = courier
        .post_form("/delivery/orders/ORD1/accept", &[])
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Profile
// =============================================================================

#[tokio::test]
async fn test_profile_update() {
    let app = TestApp::new();
    let mut customer = app.client();
    customer
        .post_form(
            "/auth/customer/signup",
            &[
                ("name", "Asha"),
                ("email", "asha@example.com"),
                ("phone", "9876543210"),
                ("password", "secret123"),
                ("confirm_password", "secret123"),
            ],
        )
        .await;

    let resp = customer
        .post_form("/profile", &[("name", "Asha Rao"), ("phone", "9000000001")])
        .await;
    assert_eq!(resp.location(), Some("/profile"));

    let resp = customer.get("/profile").await;
    assert!(resp.body.contains("Profile updated successfully"));
    assert!(resp.body.contains("Asha Rao"));
    assert!(resp.body.contains("9000000001"));
}
