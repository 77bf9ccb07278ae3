//! Smoke tests against a running admin panel.
//!
//! These tests require the admin server running locally
//! (`cargo run -p loomworks-admin`) with a reachable store API behind it.
//!
//! Run with: `cargo test -p loomworks-integration-tests -- --ignored`

use reqwest::StatusCode;

/// Base URL for the admin panel (configurable via environment).
fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_health_endpoint_live() {
    let base_url = admin_base_url();

    let resp = reqwest::get(format!("{base_url}/health"))
        .await
        .expect("Failed to reach admin server");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read response"), "ok");
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_login_page_live() {
    let base_url = admin_base_url();
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client");

    // A panel with a persisted session bounces /login to the dashboard.
    let resp = client
        .get(format!("{base_url}/login"))
        .send()
        .await
        .expect("Failed to reach admin server");

    if resp.status() == StatusCode::SEE_OTHER {
        return;
    }
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Admin Panel Login"));
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_protected_pages_redirect_without_session_live() {
    let base_url = admin_base_url();
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client");

    // Only meaningful against a server with no persisted session; a
    // logged-in panel will serve the dashboard instead.
    let resp = client
        .get(format!("{base_url}/dashboard"))
        .send()
        .await
        .expect("Failed to reach admin server");

    assert!(
        resp.status() == StatusCode::SEE_OTHER || resp.status() == StatusCode::OK,
        "unexpected status: {}",
        resp.status()
    );
}
