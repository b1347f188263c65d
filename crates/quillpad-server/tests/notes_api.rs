//! Notes CRUD surface: envelopes, validation, and pagination.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{body_json, build_app, delete_authed, get_authed, post_json, put_json, token_for};
use quillpad_auth::Role;

#[tokio::test]
async fn test_note_crud_round_trip() {
    let app = build_app();
    let token = token_for(&app, "author-1", "a@example.com", Role::User);

    // Create
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/notes",
            Some(&token),
            &json!({"title": "first", "body": "hello"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["title"], "first");
    assert_eq!(body["data"]["author_id"], "author-1");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Read
    let response = app
        .router
        .clone()
        .oneshot(get_authed(&format!("/api/notes/{id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["body"], "hello");

    // Update (partial: body untouched)
    let response = app
        .router
        .clone()
        .oneshot(put_json(
            &format!("/api/notes/{id}"),
            &token,
            &json!({"title": "renamed"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], "renamed");
    assert_eq!(body["data"]["body"], "hello");

    // Delete
    let response = app
        .router
        .clone()
        .oneshot(delete_authed(&format!("/api/notes/{id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(get_authed(&format!("/api/notes/{id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_note_is_404_envelope() {
    let app = build_app();
    let token = token_for(&app, "u1", "u@example.com", Role::User);

    let response = app
        .router
        .clone()
        .oneshot(get_authed(
            "/api/notes/00000000-0000-0000-0000-000000000000",
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_unparseable_note_id_is_validation_envelope() {
    let app = build_app();
    let token = token_for(&app, "u1", "u@example.com", Role::User);

    let response = app
        .router
        .clone()
        .oneshot(get_authed("/api/notes/not-a-uuid", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_json_body_is_validation_envelope() {
    use axum::body::Body;
    use axum::http::{Request, header};

    let app = build_app();
    let token = token_for(&app, "u1", "u@example.com", Role::User);

    let request = Request::builder()
        .method("POST")
        .uri("/api/notes")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_empty_title_is_rejected() {
    let app = build_app();
    let token = token_for(&app, "u1", "u@example.com", Role::User);

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/notes",
            Some(&token),
            &json!({"title": "   ", "body": "b"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_pagination() {
    let app = build_app();
    let token = token_for(&app, "u1", "u@example.com", Role::User);

    for i in 0..5 {
        app.router
            .clone()
            .oneshot(post_json(
                "/api/notes",
                Some(&token),
                &json!({"title": format!("note-{i}"), "body": "b"}),
            ))
            .await
            .unwrap();
    }

    let response = app
        .router
        .clone()
        .oneshot(get_authed("/api/notes?page=1&per_page=2", &token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], 5);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["per_page"], 2);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    // Newest first.
    assert_eq!(body["data"]["items"][0]["title"], "note-4");

    let response = app
        .router
        .clone()
        .oneshot(get_authed("/api/notes?page=3&per_page=2", &token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["items"][0]["title"], "note-0");
}

#[tokio::test]
async fn test_user_listing_hides_password_hashes() {
    let app = build_app();
    let admin = token_for(&app, "a1", "a@example.com", Role::Admin);

    // Create a user through signup so a real hash is stored.
    app.router
        .clone()
        .oneshot(post_json(
            "/api/auth/signup",
            None,
            &json!({"email": "u@example.com", "password": "password123"}),
        ))
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(get_authed("/api/users", &admin))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], 1);
    let user = &body["data"]["items"][0];
    assert_eq!(user["email"], "u@example.com");
    assert!(user.get("password_hash").is_none());
}
