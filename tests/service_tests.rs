//! Integration tests for the public service endpoints and API document.

use axum::http::StatusCode;
use hivequeen::server::ApiDoc;
use utoipa::OpenApi;

mod test_utils;
use test_utils::{body_json, send_json, setup_test_app};

#[tokio::test]
async fn root_reports_service_info() {
    let (_state, app) = setup_test_app().await;

    let response = send_json(&app, "GET", "/", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["service"], "hivequeen");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn healthz_reports_database_reachability() {
    let (_state, app) = setup_test_app().await;

    let response = send_json(&app, "GET", "/healthz", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}

#[test]
fn openapi_document_declares_bearer_auth() {
    let openapi = ApiDoc::openapi();
    let json = serde_json::to_value(&openapi).unwrap();

    let schemes = json
        .get("components")
        .and_then(|c| c.get("securitySchemes"))
        .expect("security schemes present");

    let bearer = schemes.get("bearer_auth").expect("bearer_auth scheme");
    assert_eq!(bearer.get("type").unwrap(), "http");
    assert_eq!(bearer.get("scheme").unwrap(), "bearer");
}

#[test]
fn openapi_document_covers_the_crud_surface() {
    let openapi = ApiDoc::openapi();
    let json = serde_json::to_value(&openapi).unwrap();
    let paths = json.get("paths").unwrap().as_object().unwrap();

    for path in [
        "/",
        "/healthz",
        "/api/v1/auth/signup/groupmng",
        "/api/v1/auth/login",
        "/api/v1/auth/logout",
        "/api/v1/overview",
        "/api/v1/clients",
        "/api/v1/clients/{id}",
        "/api/v1/spaces",
        "/api/v1/spaces/{id}",
        "/api/v1/net-addresses",
        "/api/v1/net-addresses/{id}",
    ] {
        assert!(paths.contains_key(path), "missing path: {path}");
    }
}
