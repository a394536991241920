//! Router tests that need no database.
//!
//! The app is built over a pool that cannot connect, so these cover
//! routing, auth gates, middleware and templates only.

use axum::http::{HeaderValue, StatusCode, header};

use basket_integration_tests::{body_string, get, location, offline_app, post_form, send};

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_returns_ok() {
    let app = offline_app();
    let response = send(&app, get("/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_reports_unreachable_database() {
    let app = offline_app();
    let response = send(&app, get("/health/ready", None)).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// Auth gates
// =============================================================================

#[tokio::test]
async fn test_root_redirects_to_current_list() {
    let app = offline_app();
    let response = send(&app, get("/", None)).await;

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), Some("/lists/current"));
}

#[tokio::test]
async fn test_pages_redirect_anonymous_users_to_login() {
    let app = offline_app();
    for path in ["/lists/current", "/lists/1", "/history", "/sharing", "/products/1", "/admin"] {
        let response = send(&app, get(path, None)).await;
        assert!(response.status().is_redirection(), "{path}");
        assert_eq!(location(&response), Some("/auth/login"), "{path}");
    }
}

#[tokio::test]
async fn test_api_rejects_anonymous_users() {
    let app = offline_app();
    let response = send(&app, get("/api/products/suggest?q=mi", None)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_form_posts_require_login() {
    let app = offline_app();
    let response = send(&app, post_form("/lists/1/finish", &[], None)).await;

    assert_eq!(location(&response), Some("/auth/login"));
}

// =============================================================================
// Auth pages
// =============================================================================

#[tokio::test]
async fn test_login_page_renders() {
    let app = offline_app();
    let response = send(&app, get("/auth/login", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains(r#"action="/auth/login""#));
    assert!(body.contains(r#"href="/auth/register""#));
}

#[tokio::test]
async fn test_login_page_shows_error_toast() {
    let app = offline_app();
    let response = send(&app, get("/auth/login?error=invalid_credentials", None)).await;

    let body = body_string(response).await;
    assert!(body.contains("Wrong email or password."));
}

#[tokio::test]
async fn test_unknown_toast_codes_are_not_echoed() {
    let app = offline_app();
    let response = send(&app, get("/auth/login?error=%3Cscript%3E", None)).await;

    let body = body_string(response).await;
    assert!(!body.contains("<script>"));
    assert!(body.contains("Something went wrong. Please try again."));
}

#[tokio::test]
async fn test_login_with_malformed_email_is_rejected_before_lookup() {
    let app = offline_app();
    let response = send(
        &app,
        post_form(
            "/auth/login",
            &[("email", "not-an-email"), ("password", "whatever1")],
            None,
        ),
    )
    .await;

    assert_eq!(location(&response), Some("/auth/login?error=invalid_credentials"));
}

#[tokio::test]
async fn test_register_validates_before_touching_database() {
    let app = offline_app();
    let cases = [
        ("nobody", "longenough", "longenough", "invalid_email"),
        ("a@example.com", "short", "short", "weak_password"),
        ("a@example.com", "longenough", "different1", "password_mismatch"),
    ];
    for (email, password, confirm, code) in cases {
        let response = send(
            &app,
            post_form(
                "/auth/register",
                &[
                    ("email", email),
                    ("password", password),
                    ("password_confirm", confirm),
                ],
                None,
            ),
        )
        .await;
        let expected = format!("/auth/register?error={code}");
        assert_eq!(location(&response), Some(expected.as_str()));
    }
}

// =============================================================================
// Middleware
// =============================================================================

#[tokio::test]
async fn test_security_headers_are_set() {
    let app = offline_app();
    let response = send(&app, get("/auth/login", None)).await;
    let headers = response.headers();

    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(
        headers[header::CONTENT_SECURITY_POLICY]
            .to_str()
            .unwrap_or_default()
            .contains("frame-ancestors 'none'")
    );
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let app = offline_app();

    let mut request = get("/health", None);
    request
        .headers_mut()
        .insert("x-request-id", HeaderValue::from_static("trace-42"));
    let response = send(&app, request).await;
    assert_eq!(response.headers()["x-request-id"], "trace-42");

    let response = send(&app, get("/health", None)).await;
    let generated = response.headers()["x-request-id"].to_str().unwrap_or_default();
    assert_eq!(generated.len(), 36);
}

#[tokio::test]
async fn test_static_assets_are_cached_immutably() {
    let app = offline_app();
    let response = send(&app, get("/static/css/main.css", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CACHE_CONTROL]
            .to_str()
            .unwrap_or_default()
            .contains("immutable")
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = offline_app();
    let response = send(&app, get("/nope", None)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
