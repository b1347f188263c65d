//! Signup, login, session, and logout flows.

mod common;

use axum::http::{StatusCode, header};
use serde_json::json;
use tower::ServiceExt;

use common::{body_json, build_app, get_authed, post_json};

#[tokio::test]
async fn test_signup_login_me_logout() {
    let app = build_app();

    // Signup issues a token and sets the session cookie.
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/auth/signup",
            None,
            &json!({"email": "new@example.com", "password": "hunter2hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["role"], "USER");
    let signup_token = body["data"]["token"].as_str().unwrap().to_string();

    // The token works against the session endpoint.
    let response = app
        .router
        .clone()
        .oneshot(get_authed("/api/auth/me", &signup_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], "new@example.com");

    // Login with the same credentials issues a fresh session.
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            &json!({"email": "new@example.com", "password": "hunter2hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let login_token = body["data"]["token"].as_str().unwrap().to_string();

    // Logout clears the cookie.
    let response = app
        .router
        .clone()
        .oneshot(post_json("/api/auth/logout", Some(&login_token), &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_login_wrong_password_is_401() {
    let app = build_app();

    app.router
        .clone()
        .oneshot(post_json(
            "/api/auth/signup",
            None,
            &json!({"email": "u@example.com", "password": "correct-horse"}),
        ))
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            &json!({"email": "u@example.com", "password": "battery-staple"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    // Same message as an unknown email; no account enumeration.
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_unknown_email_is_401() {
    let app = build_app();

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            &json!({"email": "nobody@example.com", "password": "whatever123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_duplicate_signup_is_validation_error() {
    let app = build_app();
    let payload = json!({"email": "dup@example.com", "password": "password123"});

    let response = app
        .router
        .clone()
        .oneshot(post_json("/api/auth/signup", None, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .router
        .clone()
        .oneshot(post_json("/api/auth/signup", None, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_signup_rejects_weak_input() {
    let app = build_app();

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/auth/signup",
            None,
            &json!({"email": "not-an-email", "password": "password123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/auth/signup",
            None,
            &json!({"email": "ok@example.com", "password": "short"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_form_post_login_from_host_pages() {
    use axum::body::Body;
    use axum::http::Request;

    let app = build_app();

    app.router
        .clone()
        .oneshot(post_json(
            "/api/auth/signup",
            None,
            &json!({"email": "u@example.com", "password": "password123"}),
        ))
        .await
        .unwrap();

    // The login page submits url-encoded form data, not JSON.
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("email=u%40example.com&password=password123"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("token="));
}

#[tokio::test]
async fn test_email_is_normalized() {
    let app = build_app();

    app.router
        .clone()
        .oneshot(post_json(
            "/api/auth/signup",
            None,
            &json!({"email": "Mixed@Example.COM", "password": "password123"}),
        ))
        .await
        .unwrap();

    // Login with different casing still matches.
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            &json!({"email": "mixed@example.com", "password": "password123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
