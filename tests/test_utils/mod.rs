//! Shared helpers for the integration suites.

use anyhow::Result;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use hivequeen::config::AppConfig;
use hivequeen::server::{AppState, create_app};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;

/// Create a fresh in-memory database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Create application state and router over a fresh in-memory database.
pub async fn setup_test_app() -> (AppState, Router) {
    let config = AppConfig {
        profile: "test".to_string(),
        ..Default::default()
    };

    let db = setup_test_db().await.expect("Failed to init test DB");
    let state = AppState::new(config, db);
    let app = create_app(state.clone());

    (state, app)
}

/// Send a JSON request through the router.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Decode a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Sign up a group manager and return their session token.
pub async fn signup_groupmng(app: &Router, username: &str) -> String {
    let response = send_json(
        app,
        "POST",
        "/api/v1/auth/signup/groupmng",
        None,
        Some(serde_json::json!({
            "username": username,
            "password": "a-strong-enough-password"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    json["token"].as_str().expect("session token").to_string()
}
