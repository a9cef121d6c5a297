//! Integration tests for the public pages and the middleware stack.

use axum::http::StatusCode;
use localazy_integration_tests::TestApp;

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();
    let mut client = app.client();

    let resp = client.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");

    let resp = client.get("/health/ready").await;
    assert_eq!(resp.status, StatusCode::OK);
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_home_page_renders() {
    let app = TestApp::new();
    let resp = app.client().get("/").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("LocaLazy"));
    assert!(resp.body.contains("/static/css/main.css?v="));
}

#[tokio::test]
async fn test_content_pages_render_markdown() {
    let app = TestApp::new();
    let mut client = app.client();

    let about = client.get("/about").await;
    assert_eq!(about.status, StatusCode::OK);
    assert!(about.body.contains("About LocaLazy"));

    let help = client.get("/help").await;
    assert_eq!(help.status, StatusCode::OK);
}

#[tokio::test]
async fn test_shop_directory_and_search() {
    let app = TestApp::new();
    let mut client = app.client();

    let resp = client.get("/shops").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Fresh Grocery Store"));
    assert!(resp.body.contains("Sweet Delight Bakery"));

    let resp = client.get("/shops?q=pharmacy").await;
    assert!(resp.body.contains("MediQuick Pharmacy"));
    assert!(!resp.body.contains("Sweet Delight Bakery"));
}

#[tokio::test]
async fn test_shop_detail_filters_items() {
    let app = TestApp::new();
    let mut client = app.client();

    let resp = client.get("/shops/1").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Fresh Apples"));
    assert!(resp.body.contains("Milk"));

    let resp = client.get("/shops/1?q=apple").await;
    assert!(resp.body.contains("Fresh Apples"));
    assert!(!resp.body.contains("Organic Bananas"));
}

#[tokio::test]
async fn test_unknown_shop_is_not_found() {
    let app = TestApp::new();
    let resp = app.client().get("/shops/999").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_user_kind_is_not_found() {
    let app = TestApp::new();
    let resp = app.client().get("/auth/admin").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Location
// =============================================================================

#[tokio::test]
async fn test_set_location_shows_in_header() {
    let app = TestApp::new();
    let mut client = app.client();

    let resp = client.post_form("/location", &[("location", "   ")]).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/location"));

    let resp = client
        .post_form("/location", &[("location", "Koramangala, Bangalore")])
        .await;
    assert_eq!(resp.location(), Some("/shops"));

    let resp = client.get("/shops").await;
    assert!(resp.body.contains("Koramangala, Bangalore"));
}

// =============================================================================
// Middleware
// =============================================================================

#[tokio::test]
async fn test_security_headers_present() {
    let app = TestApp::new();
    let resp = app.client().get("/").await;

    assert_eq!(resp.header("x-frame-options"), Some("DENY"));
    assert_eq!(resp.header("x-content-type-options"), Some("nosniff"));
    assert!(resp.header("content-security-policy").is_some());
}

#[tokio::test]
async fn test_request_id_generated() {
    let app = TestApp::new();
    let resp = app.client().get("/health").await;

    let id = resp.header("x-request-id").unwrap_or_default();
    assert_eq!(id.len(), 36, "expected a UUID, got {id:?}");
}

#[tokio::test]
async fn test_static_files_are_cached() {
    let app = TestApp::new();
    let resp = app.client().get("/static/css/main.css").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.header("cache-control"),
        Some("public, max-age=31536000, immutable")
    );
}
