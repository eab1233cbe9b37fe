//! # Account Handlers
//!
//! Sign-up, login, and logout. Group-manager sign-up creates the account and
//! immediately opens a session, mirroring the original signup-then-login
//! flow.

use crate::auth::{self, CurrentUser};
use crate::error::ApiError;
use crate::handlers::to_rfc3339;
use crate::models::user::UserRole;
use crate::repositories::{CreateUserRequest, SessionRepository, UserRepository};
use crate::server::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Request payload for sign-up and login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CredentialsDto {
    /// Login name
    #[schema(example = "lab.manager")]
    pub username: String,
    /// Plaintext password (hashed server-side, never stored)
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

/// Public view of a user account
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    /// Unique identifier for the user
    #[schema(value_type = String)]
    pub id: Uuid,
    /// Login name
    pub username: String,
    /// Role discriminator (admin|groupmng|member)
    pub user_type: String,
}

impl From<crate::models::user::Model> for UserInfo {
    fn from(model: crate::models::user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            user_type: model.user_type,
        }
    }
}

/// Response payload for a successfully opened session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponseDto {
    /// Bearer token to present on subsequent requests
    pub token: String,
    /// Expiration timestamp (ISO 8601)
    #[schema(example = "2025-06-10T10:30:00Z")]
    pub expires_at: String,
    /// The authenticated account
    pub user: UserInfo,
}

/// Sign up as a group manager
///
/// Creates a `groupmng` account and opens a session for it in one step.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup/groupmng",
    request_body = CredentialsDto,
    responses(
        (status = 201, description = "Account created and signed in", body = SessionResponseDto, headers(
            ("X-Trace-Id", description = "Trace identifier for request correlation")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 409, description = "Username already taken", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn signup_groupmng(
    State(state): State<AppState>,
    Json(request): Json<CredentialsDto>,
) -> Result<
    (
        StatusCode,
        [(&'static str, String); 1],
        Json<SessionResponseDto>,
    ),
    ApiError,
> {
    let trace_id = Uuid::new_v4().to_string();

    validate_password(&request.password)?;

    let password_hash = auth::hash_password(&request.password)?;

    let user_repo = UserRepository::new(&state.db);
    let user = user_repo
        .create_user(CreateUserRequest {
            username: request.username,
            password_hash,
            role: UserRole::Groupmng,
        })
        .await?;

    tracing::info!(username = %user.username, "Group manager account created");

    // Log the fresh account in right away
    let session = open_session(&state, user.id).await?;

    Ok((
        StatusCode::CREATED,
        [("X-Trace-Id", trace_id)],
        Json(SessionResponseDto {
            token: session.token,
            expires_at: to_rfc3339(session.expires_at),
            user: user.into(),
        }),
    ))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = CredentialsDto,
    responses(
        (status = 200, description = "Session opened", body = SessionResponseDto),
        (status = 401, description = "Invalid credentials", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsDto>,
) -> Result<Json<SessionResponseDto>, ApiError> {
    let user_repo = UserRepository::new(&state.db);

    let user = user_repo.find_by_username(request.username.trim()).await?;

    // A single failure path for unknown users and wrong passwords, so the
    // response does not reveal which half of the credentials was bad.
    let authenticated = match user {
        Some(user) if auth::verify_password(&request.password, &user.password_hash) => user,
        _ => {
            return Err(crate::error::unauthorized(Some(
                "Invalid username or password",
            )));
        }
    };

    let session = open_session(&state, authenticated.id).await?;

    tracing::info!(username = %authenticated.username, "Login succeeded");

    Ok(Json(SessionResponseDto {
        token: session.token,
        expires_at: to_rfc3339(session.expires_at),
        user: authenticated.into(),
    }))
}

/// Log out, revoking the presented session token
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "Missing or invalid session token", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<StatusCode, ApiError> {
    SessionRepository::new(&state.db)
        .delete_by_token(&user.session_token)
        .await?;

    tracing::info!(username = %user.username, "Logged out");

    Ok(StatusCode::NO_CONTENT)
}

async fn open_session(
    state: &AppState,
    user_id: Uuid,
) -> Result<crate::models::session::Model, ApiError> {
    let token = auth::generate_session_token();
    let session = SessionRepository::new(&state.db)
        .create_session(user_id, token, state.config.session_ttl_seconds)
        .await?;
    Ok(session)
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 8 {
        return Err(crate::error::validation_error(
            "Password is too short",
            serde_json::json!({
                "field": "password",
                "message": "Password must be at least 8 characters"
            }),
        ));
    }

    Ok(())
}
