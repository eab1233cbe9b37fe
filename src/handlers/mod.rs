//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for HiveQueen.

use crate::error::ApiError;
use crate::models::ServiceInfo;
use crate::server::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod accounts;
pub mod clients;
pub mod net_addresses;
pub mod overview;
pub mod spaces;

/// Render a database timestamp as an RFC 3339 string in UTC.
pub(crate) fn to_rfc3339(dt: sea_orm::prelude::DateTimeWithTimeZone) -> String {
    let utc: DateTime<Utc> = dt.with_timezone(&Utc);
    utc.to_rfc3339()
}

/// Validate and default limit/offset query parameters shared by the list
/// endpoints.
pub(crate) fn validate_paging(
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<(i64, i64), ApiError> {
    let limit = limit.unwrap_or(50);
    if !(1..=100).contains(&limit) {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "limit must be between 1 and 100",
        ));
    }

    let offset = offset.unwrap_or(0);
    if offset < 0 {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "offset must not be negative",
        ));
    }

    Ok((limit, offset))
}

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    /// Overall service status
    #[schema(example = "ok")]
    pub status: String,
    /// Database reachability
    pub database: bool,
}

/// Liveness endpoint that also verifies database reachability
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is healthy", body = HealthStatus),
        (status = 503, description = "Database unavailable", body = ApiError)
    ),
    tag = "root"
)]
pub async fn healthz(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    crate::db::health_check(&state.db)
        .await
        .map_err(|err| {
            tracing::error!("Health check failed: {:?}", err);
            ApiError::from(crate::error::ErrorType::ServiceUnavailable)
        })?;

    Ok(Json(HealthStatus {
        status: "ok".to_string(),
        database: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_defaults_and_bounds() {
        assert_eq!(validate_paging(None, None).unwrap(), (50, 0));
        assert_eq!(validate_paging(Some(100), Some(10)).unwrap(), (100, 10));
        assert!(validate_paging(Some(0), None).is_err());
        assert!(validate_paging(Some(101), None).is_err());
        assert!(validate_paging(None, Some(-1)).is_err());
    }
}
