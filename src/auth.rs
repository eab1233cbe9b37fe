//! # Authentication and Authorization
//!
//! This module provides session bearer authentication and role-based
//! permission checks for protected API endpoints. Tokens are minted at
//! login/sign-up, stored in the sessions table, and resolved to a
//! [`CurrentUser`] request extension by the middleware.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use uuid::Uuid;

use crate::error::{ApiError, forbidden, unauthorized, unauthorized_with_trace_id};
use crate::models::user::{Model as UserModel, UserRole};
use crate::repositories::SessionRepository;
use crate::server::AppState;
use crate::telemetry::TraceContext;

/// Authenticated user attached to the request by the middleware
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
    /// The bearer token the request authenticated with (needed for logout)
    pub session_token: String,
}

impl CurrentUser {
    fn from_model(user: UserModel, session_token: String) -> Self {
        let role = user.role();
        Self {
            id: user.id,
            username: user.username,
            role,
            session_token,
        }
    }

    /// Require the inventory-management permission, or fail with 403.
    pub fn require_inventory_management(&self) -> Result<(), ApiError> {
        if self.role.can_manage_inventory() {
            Ok(())
        } else {
            Err(forbidden(Some(
                "This account is not allowed to modify the inventory",
            )))
        }
    }
}

/// Authentication middleware that resolves session bearer tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let headers = request.headers().clone();

    // Extract trace_id from request context for consistent error responses
    let trace_id = request
        .extensions()
        .get::<TraceContext>()
        .map(|ctx| ctx.trace_id.clone());

    let token = extract_bearer_token_with_trace_id(&headers, trace_id.clone())?;

    let session_repo = SessionRepository::new(&state.db);
    let resolved = session_repo.resolve_token(token).await?;

    let Some((session, user)) = resolved else {
        return Err(match trace_id {
            Some(trace_id) => {
                unauthorized_with_trace_id(Some("Invalid or expired session token"), trace_id)
            }
            None => unauthorized(Some("Invalid or expired session token")),
        });
    };

    tracing::info!(user = %user.username, "Authenticated request");

    let current_user = CurrentUser::from_model(user, session.token);

    let mut request = request;
    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

fn extract_bearer_token_with_trace_id(
    headers: &HeaderMap,
    trace_id: Option<String>,
) -> Result<&str, ApiError> {
    let trace_id_clone = trace_id.clone();

    headers
        .get(AUTHORIZATION)
        .ok_or_else(|| {
            if let Some(trace_id_val) = trace_id_clone {
                unauthorized_with_trace_id(Some("Missing Authorization header"), trace_id_val)
            } else {
                unauthorized(Some("Missing Authorization header"))
            }
        })
        .and_then(|value| {
            let trace_id_clone2 = trace_id.clone();
            value.to_str().map_err(|_| {
                if let Some(trace_id_val) = trace_id_clone2 {
                    unauthorized_with_trace_id(Some("Invalid Authorization header"), trace_id_val)
                } else {
                    unauthorized(Some("Invalid Authorization header"))
                }
            })
        })
        .and_then(|header| {
            header.strip_prefix("Bearer ").ok_or_else(|| {
                if let Some(trace_id_val) = trace_id {
                    unauthorized_with_trace_id(
                        Some("Authorization header must use Bearer scheme"),
                        trace_id_val,
                    )
                } else {
                    unauthorized(Some("Authorization header must use Bearer scheme"))
                }
            })
        })
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| unauthorized(Some("Authentication required")))
    }
}

/// Hash a password with Argon2id, producing a PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| {
            tracing::error!("Password hashing failed: {}", err);
            ApiError::from(crate::error::ErrorType::InternalServerError)
        })
}

/// Verify a password against a stored PHC string.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Mint a random URL-safe session token (256 bits of entropy).
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn session_tokens_are_unique_and_url_safe() {
        let a = generate_session_token();
        let b = generate_session_token();

        assert_ne!(a, b);
        assert_eq!(URL_SAFE_NO_PAD.decode(&a).unwrap().len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn member_cannot_manage_inventory() {
        let user = CurrentUser {
            id: Uuid::new_v4(),
            username: "viewer".to_string(),
            role: UserRole::Member,
            session_token: "tok".to_string(),
        };

        let err = user.require_inventory_management().unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn groupmng_can_manage_inventory() {
        let user = CurrentUser {
            id: Uuid::new_v4(),
            username: "manager".to_string(),
            role: UserRole::Groupmng,
            session_token: "tok".to_string(),
        };

        assert!(user.require_inventory_management().is_ok());
    }
}
