//! Integration tests for sign-up, login, logout, and access control.

use axum::http::StatusCode;
use hivequeen::models::user::UserRole;
use hivequeen::repositories::{CreateUserRequest, SessionRepository, UserRepository};
use serde_json::json;
use tower::ServiceExt;

mod test_utils;
use test_utils::{body_json, send_json, setup_test_app, signup_groupmng};

#[tokio::test]
async fn unauthenticated_requests_are_rejected() {
    let (_state, app) = setup_test_app().await;

    for uri in [
        "/api/v1/overview",
        "/api/v1/clients",
        "/api/v1/spaces",
        "/api/v1/net-addresses",
    ] {
        let response = send_json(&app, "GET", uri, None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri: {uri}");

        let error = body_json(response).await;
        assert_eq!(error["code"], "UNAUTHORIZED");
        assert!(error["trace_id"].is_string());
    }
}

#[tokio::test]
async fn bearer_scheme_is_required() {
    let (_state, app) = setup_test_app().await;

    let response = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .method("GET")
                .uri("/api/v1/overview")
                .header("Authorization", "Basic dGVzdDoxMjM=")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn groupmng_signup_creates_account_and_logs_in() {
    let (state, app) = setup_test_app().await;

    let response = send_json(
        &app,
        "POST",
        "/api/v1/auth/signup/groupmng",
        None,
        Some(json!({
            "username": "lab.manager",
            "password": "a-strong-enough-password"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().get("X-Trace-Id").is_some());

    let body = body_json(response).await;
    assert_eq!(body["user"]["username"], "lab.manager");
    assert_eq!(body["user"]["user_type"], "groupmng");

    // The token from sign-up authenticates immediately (auto-login)
    let token = body["token"].as_str().unwrap();
    let overview = send_json(&app, "GET", "/api/v1/overview", Some(token), None).await;
    assert_eq!(overview.status(), StatusCode::OK);

    // The account really is stored with the groupmng role
    let stored = UserRepository::new(&state.db)
        .find_by_username("lab.manager")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.user_type, "groupmng");
}

#[tokio::test]
async fn duplicate_username_signup_conflicts() {
    let (_state, app) = setup_test_app().await;

    signup_groupmng(&app, "taken").await;

    let response = send_json(
        &app,
        "POST",
        "/api/v1/auth/signup/groupmng",
        None,
        Some(json!({
            "username": "taken",
            "password": "a-strong-enough-password"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error = body_json(response).await;
    assert_eq!(error["code"], "CONFLICT");
}

#[tokio::test]
async fn short_password_is_rejected() {
    let (_state, app) = setup_test_app().await;

    let response = send_json(
        &app,
        "POST",
        "/api/v1/auth/signup/groupmng",
        None,
        Some(json!({
            "username": "short.pw",
            "password": "short"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert_eq!(error["code"], "VALIDATION_FAILED");
    assert_eq!(error["details"]["field"], "password");
}

#[tokio::test]
async fn login_does_not_reveal_which_credential_was_wrong() {
    let (_state, app) = setup_test_app().await;

    signup_groupmng(&app, "lab.manager").await;

    let wrong_password = send_json(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"username": "lab.manager", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(wrong_password).await;

    let unknown_user = send_json(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"username": "nobody", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_user = body_json(unknown_user).await;

    assert_eq!(wrong_password["message"], unknown_user["message"]);
}

#[tokio::test]
async fn login_opens_a_working_session() {
    let (_state, app) = setup_test_app().await;

    signup_groupmng(&app, "lab.manager").await;

    let response = send_json(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({
            "username": "lab.manager",
            "password": "a-strong-enough-password"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let token = body["token"].as_str().unwrap();

    let overview = send_json(&app, "GET", "/api/v1/overview", Some(token), None).await;
    assert_eq!(overview.status(), StatusCode::OK);
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let (_state, app) = setup_test_app().await;

    let token = signup_groupmng(&app, "lab.manager").await;

    let logout = send_json(&app, "POST", "/api/v1/auth/logout", Some(&token), None).await;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    let after = send_json(&app, "GET", "/api/v1/overview", Some(&token), None).await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_sessions_do_not_authenticate() {
    let (state, app) = setup_test_app().await;

    let user = UserRepository::new(&state.db)
        .create_user(CreateUserRequest {
            username: "stale".to_string(),
            password_hash: hivequeen::auth::hash_password("a-strong-enough-password").unwrap(),
            role: UserRole::Member,
        })
        .await
        .unwrap();

    // TTL of zero expires the session immediately
    SessionRepository::new(&state.db)
        .create_session(user.id, "stale-token".to_string(), 0)
        .await
        .unwrap();

    let response = send_json(&app, "GET", "/api/v1/overview", Some("stale-token"), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn member_accounts_cannot_modify_inventory() {
    let (state, app) = setup_test_app().await;

    let user = UserRepository::new(&state.db)
        .create_user(CreateUserRequest {
            username: "viewer".to_string(),
            password_hash: hivequeen::auth::hash_password("a-strong-enough-password").unwrap(),
            role: UserRole::Member,
        })
        .await
        .unwrap();

    SessionRepository::new(&state.db)
        .create_session(user.id, "viewer-token".to_string(), 3600)
        .await
        .unwrap();

    // Reads are allowed
    let list = send_json(&app, "GET", "/api/v1/clients", Some("viewer-token"), None).await;
    assert_eq!(list.status(), StatusCode::OK);

    // Mutations are not
    let create = send_json(
        &app,
        "POST",
        "/api/v1/clients",
        Some("viewer-token"),
        Some(json!({"name": "it001"})),
    )
    .await;
    assert_eq!(create.status(), StatusCode::FORBIDDEN);

    let error = body_json(create).await;
    assert_eq!(error["code"], "FORBIDDEN");
}
