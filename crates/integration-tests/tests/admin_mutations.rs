//! Form submissions: create, update, moderate, delete.
//!
//! Mutations are plain form posts that redirect back to their listing with
//! a banner message. These tests pin the upstream payloads (via exact body
//! matching) and the redirect targets.

use loomworks_integration_tests::{TestContext, client};
use reqwest::StatusCode;
use reqwest::header::LOCATION;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_create_product_posts_upstream_and_redirects() {
    let ctx = TestContext::start_logged_in().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/products"))
        .and(body_json(json!({
            "title": "Block Print Blouse",
            "description": "Hand block printed",
            "price": 1250.0,
            "category": "Blouse",
            "stock": 12,
            "images": ["https://cdn.example.com/blouse.jpg"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {"_id": "p-new", "title": "Block Print Blouse", "price": 1250.0, "category": "Blouse", "stock": 12}
        })))
        .expect(1)
        .mount(&ctx.upstream)
        .await;

    let resp = client()
        .post(ctx.url("/products"))
        .form(&[
            ("title", "Block Print Blouse"),
            ("description", "Hand block printed"),
            ("price", "1250"),
            ("category", "Blouse"),
            ("stock", "12"),
            ("image_url", "https://cdn.example.com/blouse.jpg"),
        ])
        .send()
        .await
        .expect("Failed to post product form");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/products?success=Product%20added%20successfully");
}

#[tokio::test]
async fn test_update_product_omits_images_key() {
    let ctx = TestContext::start_logged_in().await;

    // Exact body match: the edit form has no image field, and an update
    // without one must not send an empty list that would wipe the stored
    // images upstream.
    Mock::given(method("PUT"))
        .and(path("/api/admin/products/p1"))
        .and(body_json(json!({
            "title": "Jute Tote",
            "description": "",
            "price": 499.0,
            "category": "Bags",
            "stock": 30
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"_id": "p1", "title": "Jute Tote", "price": 499.0, "category": "Bags", "stock": 30}
        })))
        .expect(1)
        .mount(&ctx.upstream)
        .await;

    let resp = client()
        .post(ctx.url("/products/p1"))
        .form(&[
            ("title", "Jute Tote"),
            ("price", "499"),
            ("category", "Bags"),
            ("stock", "30"),
        ])
        .send()
        .await
        .expect("Failed to post product form");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/products?success=Product%20updated%20successfully");
}

#[tokio::test]
async fn test_create_product_validation_rerenders_form() {
    let ctx = TestContext::start_logged_in().await;
    let http = client();

    let resp = http
        .post(ctx.url("/products"))
        .form(&[
            ("title", ""),
            ("price", "100"),
            ("category", "Bags"),
            ("stock", "1"),
        ])
        .send()
        .await
        .expect("Failed to post product form");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Title is required"));

    let resp = http
        .post(ctx.url("/products"))
        .form(&[
            ("title", "Tote"),
            ("price", "free"),
            ("category", "Bags"),
            ("stock", "1"),
        ])
        .send()
        .await
        .expect("Failed to post product form");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Please enter a valid price"));
    // Submitted values are echoed back into the form.
    assert!(body.contains("value=\"Tote\""));

    // Rejected input never reaches the upstream.
    let requests = ctx.upstream.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_create_product_upstream_rejection_rerenders_form() {
    let ctx = TestContext::start_logged_in().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/products"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Title already exists"})),
        )
        .mount(&ctx.upstream)
        .await;

    let resp = client()
        .post(ctx.url("/products"))
        .form(&[
            ("title", "Block Print Blouse"),
            ("price", "1250"),
            ("category", "Blouse"),
            ("stock", "12"),
        ])
        .send()
        .await
        .expect("Failed to post product form");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Title already exists"));
    assert!(body.contains("value=\"Block Print Blouse\""));
}

#[tokio::test]
async fn test_delete_product_redirects_with_banner() {
    let ctx = TestContext::start_logged_in().await;

    Mock::given(method("DELETE"))
        .and(path("/api/admin/products/p1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Product removed"})),
        )
        .expect(1)
        .mount(&ctx.upstream)
        .await;

    let resp = client()
        .post(ctx.url("/products/p1/delete"))
        .send()
        .await
        .expect("Failed to post delete");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/products?success=Product%20deleted%20successfully");
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn test_order_status_update_posts_upstream() {
    let ctx = TestContext::start_logged_in().await;

    Mock::given(method("PUT"))
        .and(path("/api/admin/orders/o1/status"))
        .and(body_json(json!({"status": "Shipped"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "_id": "o1",
                "items": [],
                "customerDetails": {"fullName": "Ravi Kumar", "email": "ravi@example.com"},
                "totalAmount": 349.5,
                "status": "Shipped"
            }
        })))
        .expect(1)
        .mount(&ctx.upstream)
        .await;

    let resp = client()
        .post(ctx.url("/orders/o1/status"))
        .form(&[("status", "Shipped")])
        .send()
        .await
        .expect("Failed to post status form");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/orders?success=Order%20status%20updated");
}

#[tokio::test]
async fn test_order_status_rejects_unknown_value() {
    let ctx = TestContext::start_logged_in().await;

    let resp = client()
        .post(ctx.url("/orders/o1/status"))
        .form(&[("status", "Teleported")])
        .send()
        .await
        .expect("Failed to post status form");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/orders?error=Invalid%20order%20status");

    let requests = ctx.upstream.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

// ============================================================================
// Customers
// ============================================================================

#[tokio::test]
async fn test_create_customer_sends_password_once() {
    let ctx = TestContext::start_logged_in().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/customers"))
        .and(body_json(json!({
            "fullName": "Ravi Kumar",
            "email": "ravi@example.com",
            "phone": "9876543210",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {"_id": "c-new", "fullName": "Ravi Kumar", "email": "ravi@example.com"}
        })))
        .expect(1)
        .mount(&ctx.upstream)
        .await;

    let resp = client()
        .post(ctx.url("/customers"))
        .form(&[
            ("full_name", "Ravi Kumar"),
            ("email", "ravi@example.com"),
            ("phone", "9876543210"),
            ("password", "hunter2"),
        ])
        .send()
        .await
        .expect("Failed to post customer form");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/customers?success=Customer%20added%20successfully");
}

#[tokio::test]
async fn test_update_customer_never_sends_password() {
    let ctx = TestContext::start_logged_in().await;

    // Exact body match: no password key on updates.
    Mock::given(method("PUT"))
        .and(path("/api/admin/customers/c1"))
        .and(body_json(json!({
            "fullName": "Ravi Kumar",
            "email": "ravi@example.com",
            "phone": "9876543210"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"_id": "c1", "fullName": "Ravi Kumar", "email": "ravi@example.com"}
        })))
        .expect(1)
        .mount(&ctx.upstream)
        .await;

    let resp = client()
        .post(ctx.url("/customers/c1"))
        .form(&[
            ("full_name", "Ravi Kumar"),
            ("email", "ravi@example.com"),
            ("phone", "9876543210"),
        ])
        .send()
        .await
        .expect("Failed to post customer form");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/customers?success=Customer%20updated%20successfully");
}

#[tokio::test]
async fn test_create_customer_requires_password() {
    let ctx = TestContext::start_logged_in().await;

    let resp = client()
        .post(ctx.url("/customers"))
        .form(&[("full_name", "Ravi Kumar"), ("email", "ravi@example.com")])
        .send()
        .await
        .expect("Failed to post customer form");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Please fill in all fields"));

    let requests = ctx.upstream.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_suspend_and_activate_customer() {
    let ctx = TestContext::start_logged_in().await;
    let http = client();

    Mock::given(method("PATCH"))
        .and(path("/api/admin/customers/c1/status"))
        .and(body_json(json!({"isActive": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"_id": "c1", "fullName": "Ravi Kumar", "email": "ravi@example.com", "isActive": false}
        })))
        .mount(&ctx.upstream)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/admin/customers/c1/status"))
        .and(body_json(json!({"isActive": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"_id": "c1", "fullName": "Ravi Kumar", "email": "ravi@example.com", "isActive": true}
        })))
        .mount(&ctx.upstream)
        .await;

    // The banner reflects the state the upstream reports back.
    let resp = http
        .post(ctx.url("/customers/c1/status"))
        .form(&[("is_active", "false")])
        .send()
        .await
        .expect("Failed to post status form");
    assert_eq!(location(&resp), "/customers?success=Customer%20suspended");

    let resp = http
        .post(ctx.url("/customers/c1/status"))
        .form(&[("is_active", "true")])
        .send()
        .await
        .expect("Failed to post status form");
    assert_eq!(location(&resp), "/customers?success=Customer%20activated");
}

// ============================================================================
// Reviews
// ============================================================================

#[tokio::test]
async fn test_approve_review_redirects_with_banner() {
    let ctx = TestContext::start_logged_in().await;

    Mock::given(method("PATCH"))
        .and(path("/api/admin/reviews/r1/approve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"_id": "r1", "productId": "p1", "rating": 5, "isApproved": true}
        })))
        .expect(1)
        .mount(&ctx.upstream)
        .await;

    let resp = client()
        .post(ctx.url("/reviews/r1/approve"))
        .send()
        .await
        .expect("Failed to post approve");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/reviews?success=Review%20approved");
}

#[tokio::test]
async fn test_reject_and_delete_review() {
    let ctx = TestContext::start_logged_in().await;
    let http = client();

    Mock::given(method("PATCH"))
        .and(path("/api/admin/reviews/r1/reject"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"_id": "r1", "productId": "p1", "rating": 2, "isApproved": false}
        })))
        .mount(&ctx.upstream)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/reviews/r1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Review deleted"})),
        )
        .mount(&ctx.upstream)
        .await;

    let resp = http
        .post(ctx.url("/reviews/r1/reject"))
        .send()
        .await
        .expect("Failed to post reject");
    assert_eq!(location(&resp), "/reviews?success=Review%20rejected");

    let resp = http
        .post(ctx.url("/reviews/r1/delete"))
        .send()
        .await
        .expect("Failed to post delete");
    assert_eq!(location(&resp), "/reviews?success=Review%20deleted");
}

#[tokio::test]
async fn test_moderation_failure_redirects_with_error() {
    let ctx = TestContext::start_logged_in().await;

    Mock::given(method("PATCH"))
        .and(path("/api/admin/reviews/gone/approve"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Review not found"})),
        )
        .mount(&ctx.upstream)
        .await;

    let resp = client()
        .post(ctx.url("/reviews/gone/approve"))
        .send()
        .await
        .expect("Failed to post approve");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/reviews?error=Review%20not%20found");
}
