use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use usersvc::{app::build_app, state::AppState};

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

#[tokio::test]
async fn health_is_ok() {
    let app = build_app(AppState::in_memory());
    let (status, body) = call(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));
}

#[tokio::test]
async fn create_list_update_delete_flow() {
    let app = build_app(AppState::in_memory());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({"name": "Ada", "email": "ada@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"success": true, "message": "User created successfully", "outcome": "created"}));

    let (status, users) = call(&app, Method::GET, "/api/v1/users", None).await;
    assert_eq!(status, StatusCode::OK);
    let id = users[0]["id"].as_i64().unwrap();
    assert_eq!(users[0]["created_at"], users[0]["updated_at"]);

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/v1/users/{id}"),
        Some(json!({"name": "Ada L.", "email": "ada@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User updated successfully");

    let (_, users) = call(&app, Method::GET, "/api/v1/users", None).await;
    assert_eq!(users[0]["name"], "Ada L.");

    let (status, body) = call(&app, Method::DELETE, &format!("/api/v1/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let (status, body) = call(&app, Method::DELETE, &format!("/api/v1/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "User not found", "outcome": "not_found"}));
}

#[tokio::test]
async fn validation_failures_are_unprocessable() {
    let app = build_app(AppState::in_memory());

    let (status, body) = call(&app, Method::POST, "/api/v1/users", Some(json!({"email": "x@y.io"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Name is required");

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/v1/users/abc",
        Some(json!({"name": "Ada", "email": "ada@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Invalid user id");

    let (_, users) = call(&app, Method::GET, "/api/v1/users", None).await;
    assert_eq!(users, json!([]));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let app = build_app(AppState::in_memory());
    let payload = json!({"name": "Ada", "email": "ada@example.com"});

    let (status, _) = call(&app, Method::POST, "/api/v1/users", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(&app, Method::POST, "/api/v1/users", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already exists");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn malformed_delete_id_is_reported_as_invalid() {
    let app = build_app(AppState::in_memory());

    for uri in ["/api/v1/users/abc", "/api/v1/users/99999999999"] {
        let (status, body) = call(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert_eq!(
            body,
            json!({"success": false, "message": "Invalid user id", "outcome": "invalid"})
        );
    }
}

#[tokio::test]
async fn mistyped_json_body_gets_a_fixed_message() {
    let app = build_app(AppState::in_memory());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({"name": 5, "email": "ada@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"success": false, "message": "Invalid request body", "outcome": "invalid"})
    );

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/v1/users/1",
        Some(json!(["not", "an", "object"])),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Invalid request body");
}

#[tokio::test]
async fn body_without_json_content_type_gets_a_result() {
    let app = build_app(AppState::in_memory());

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/users")
        .body(Body::from(r#"{"name":"Ada","email":"ada@example.com"}"#))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["outcome"], "invalid");
    assert!(!body["message"].as_str().unwrap().contains("Content-Type"));

    let (_, users) = call(&app, Method::GET, "/api/v1/users", None).await;
    assert_eq!(users, json!([]));
}
