//! Integration tests for registration, login and logout.

#![allow(clippy::unwrap_used)]

use quill_integration_tests::{TestApp, location, new_client};
use reqwest::StatusCode;

#[tokio::test]
async fn test_register_logs_in_and_redirects_home() {
    let app = TestApp::spawn().await;

    let resp = app
        .register(&app.client, "alice@example.com", "pw123", "Alice")
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));

    let cookie = resp
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(cookie.starts_with("quill_session="));
    assert!(cookie.contains("HttpOnly"));

    let home = app.get(&app.client, "/").await.text().await.unwrap();
    assert!(home.contains("Log Out"));
    assert!(home.contains("Alice"));

    let resp = app.get(&app.client, "/new-post").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_email_is_a_conflict() {
    let app = TestApp::spawn().await;
    app.register(&app.client, "alice@example.com", "pw123", "Alice")
        .await;

    let other = new_client();
    let resp = app
        .register(&other, "alice@example.com", "secret", "Impostor")
        .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = resp.text().await.unwrap();
    assert!(body.contains("An account with this email already exists"));
    assert!(body.contains("alice@example.com"));

    assert_eq!(app.count("users").await, 1);
}

#[tokio::test]
async fn test_invalid_registration_rerenders_form() {
    let app = TestApp::spawn().await;

    let resp = app
        .register(&app.client, "not-an-email", "pw123", "")
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Invalid email address."));
    assert!(body.contains("This field is required."));

    assert_eq!(app.count("users").await, 0);
}

#[tokio::test]
async fn test_login_with_wrong_password_creates_no_session() {
    let app = TestApp::spawn().await;
    app.register(&new_client(), "alice@example.com", "pw123", "Alice")
        .await;

    let resp = app
        .login(&app.client, "alice@example.com", "wrong")
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.text().await.unwrap().contains("Incorrect password"));

    let resp = app.get(&app.client, "/new-post").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/login"));
}

#[tokio::test]
async fn test_login_with_unknown_email_creates_no_session() {
    let app = TestApp::spawn().await;

    let resp = app.login(&app.client, "bob@example.com", "pw123").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.text().await.unwrap().contains("Email is not registered"));

    let resp = app.get(&app.client, "/new-post").await;
    assert_eq!(location(&resp), Some("/login"));
}

#[tokio::test]
async fn test_login_then_logout() {
    let app = TestApp::spawn().await;
    app.register(&new_client(), "alice@example.com", "pw123", "Alice")
        .await;

    let resp = app.login(&app.client, "alice@example.com", "pw123").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));
    assert_eq!(
        app.get(&app.client, "/new-post").await.status(),
        StatusCode::OK
    );

    let resp = app.get(&app.client, "/logout").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));

    let resp = app.get(&app.client, "/new-post").await;
    assert_eq!(location(&resp), Some("/login"));

    // Logging out twice is harmless.
    let resp = app.get(&app.client, "/logout").await;
    assert_eq!(location(&resp), Some("/"));
}

#[tokio::test]
async fn test_auth_pages_render() {
    let app = TestApp::spawn().await;

    for path in ["/register", "/login", "/about", "/contact"] {
        let resp = app.get(&app.client, path).await;
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::spawn().await;

    let resp = app.get(&app.client, "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = app.get(&app.client, "/health/ready").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}
