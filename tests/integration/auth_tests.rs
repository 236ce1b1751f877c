//! Authentication integration tests.
//!
//! Tests verify:
//! - Missing/malformed Authorization headers are rejected with 401
//! - Rejected tokens are 401 and never reach the image provider
//! - Valid tokens attach the principal for downstream handlers
//! - The auth toggle only affects image generation, never the profile route

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use imagegen_gateway::server::RouterConfig;

use super::test_utils::{
    body_json, build_router, json_post, json_post_with_token, test_principal,
    MockIdentityProvider, MockImageGenerator,
};

const VALID_TOKEN: &str = "valid-access-token";

fn identity_with_valid_token() -> MockIdentityProvider {
    MockIdentityProvider::new().with_token(VALID_TOKEN, test_principal())
}

fn profile_request(auth_header: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/protected/profile");
    if let Some(value) = auth_header {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

// =============================================================================
// Missing and Malformed Credentials
// =============================================================================

#[tokio::test]
async fn test_profile_without_header_is_401() {
    let identity = identity_with_valid_token();
    let router = build_router(
        MockImageGenerator::new(),
        identity.clone(),
        RouterConfig::new(),
    );

    let response = router.oneshot(profile_request(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Missing or malformed access token");

    // The identity provider is never consulted without a token
    assert_eq!(identity.resolve_count(), 0);
}

#[tokio::test]
async fn test_profile_with_non_bearer_scheme_is_401() {
    let identity = identity_with_valid_token();
    let router = build_router(
        MockImageGenerator::new(),
        identity.clone(),
        RouterConfig::new(),
    );

    let response = router
        .oneshot(profile_request(Some("Basic dXNlcjpwYXNz")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(identity.resolve_count(), 0);
}

#[tokio::test]
async fn test_profile_with_rejected_token_is_401() {
    let identity = identity_with_valid_token();
    let router = build_router(
        MockImageGenerator::new(),
        identity.clone(),
        RouterConfig::new(),
    );

    let response = router
        .oneshot(profile_request(Some("Bearer wrong-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid or expired token");
    assert_eq!(identity.resolve_count(), 1);
}

// =============================================================================
// Valid Credentials
// =============================================================================

#[tokio::test]
async fn test_profile_with_valid_token_returns_principal() {
    let router = build_router(
        MockImageGenerator::new(),
        identity_with_valid_token(),
        RouterConfig::new(),
    );

    let response = router
        .oneshot(profile_request(Some(&format!("Bearer {}", VALID_TOKEN))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["id"], "user-123");
    assert_eq!(body["user"]["email"], "fox@example.com");
    assert_eq!(body["user"]["role"], "authenticated");
}

// =============================================================================
// Gated Image Generation
// =============================================================================

#[tokio::test]
async fn test_generate_image_without_token_is_401_when_gated() {
    let generator = MockImageGenerator::new();
    let router = build_router(
        generator.clone(),
        identity_with_valid_token(),
        RouterConfig::new(),
    );

    let request = json_post(
        "/generate-image",
        serde_json::json!({"customPrompt": "a red fox"}),
    );
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    // The gate fires before any provider work
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_generate_image_with_valid_token_succeeds() {
    let generator = MockImageGenerator::with_image("https://images.example.com/fox.png");
    let router = build_router(
        generator.clone(),
        identity_with_valid_token(),
        RouterConfig::new(),
    );

    let request = json_post_with_token(
        "/generate-image",
        serde_json::json!({"customPrompt": "a red fox", "image_size": "1024x768"}),
        VALID_TOKEN,
    );
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["image"], "https://images.example.com/fox.png");
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test]
async fn test_generate_image_public_when_auth_disabled() {
    let router = build_router(
        MockImageGenerator::new(),
        identity_with_valid_token(),
        RouterConfig::without_auth(),
    );

    let request = json_post(
        "/generate-image",
        serde_json::json!({"customPrompt": "a red fox"}),
    );
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_profile_stays_gated_when_auth_disabled() {
    let router = build_router(
        MockImageGenerator::new(),
        identity_with_valid_token(),
        RouterConfig::without_auth(),
    );

    let response = router.oneshot(profile_request(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Public Routes Are Not Gated
// =============================================================================

#[tokio::test]
async fn test_health_requires_no_token() {
    let router = build_router(
        MockImageGenerator::new(),
        MockIdentityProvider::new(),
        RouterConfig::new(),
    );

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_signup_requires_no_token() {
    let router = build_router(
        MockImageGenerator::new(),
        MockIdentityProvider::new(),
        RouterConfig::new(),
    );

    let request = json_post(
        "/auth/signup",
        serde_json::json!({"email": "a@b.com", "password": "hunter2"}),
    );
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
