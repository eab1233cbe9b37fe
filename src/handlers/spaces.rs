//! # Spaces API Handlers
//!
//! CRUD endpoints for physical spaces. Only the name is settable; deleting a
//! space detaches its clients.

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::handlers::{to_rfc3339, validate_paging};
use crate::repositories::{CreateSpaceRequest, SpaceRepository};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Query parameters for space listing
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListSpacesQuery {
    /// Maximum number of spaces to return (default: 50, max: 100)
    pub limit: Option<i64>,
    /// Number of spaces to skip (default: 0)
    pub offset: Option<i64>,
}

/// Request payload for creating or renaming a space
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpaceNameDto {
    /// Display name for the space (required, max 200 characters)
    #[schema(example = "4.1B01")]
    pub name: String,
}

/// Space information for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpaceInfo {
    /// Unique identifier for the space
    #[schema(value_type = String)]
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

impl From<crate::models::space::Model> for SpaceInfo {
    fn from(model: crate::models::space::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: to_rfc3339(model.created_at),
        }
    }
}

/// Response wrapper for space listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpacesResponse {
    /// Spaces ordered by name
    pub spaces: Vec<SpaceInfo>,
    pub limit: i64,
    pub offset: i64,
}

/// List spaces ordered by name
#[utoipa::path(
    get,
    path = "/api/v1/spaces",
    security(("bearer_auth" = [])),
    params(ListSpacesQuery),
    responses(
        (status = 200, description = "List of spaces", body = SpacesResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Missing or invalid session token", body = ApiError)
    ),
    tag = "spaces"
)]
pub async fn list_spaces(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ListSpacesQuery>,
) -> Result<Json<SpacesResponse>, ApiError> {
    let (limit, offset) = validate_paging(query.limit, query.offset)?;

    let spaces = SpaceRepository::new(&state.db)
        .list_spaces(limit as u64, offset as u64)
        .await?;

    Ok(Json(SpacesResponse {
        spaces: spaces.into_iter().map(SpaceInfo::from).collect(),
        limit,
        offset,
    }))
}

/// Get a space by ID
#[utoipa::path(
    get,
    path = "/api/v1/spaces/{id}",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Space UUID")
    ),
    responses(
        (status = 200, description = "Space retrieved", body = SpaceInfo),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 404, description = "Space not found", body = ApiError)
    ),
    tag = "spaces"
)]
pub async fn get_space(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(space_id): Path<Uuid>,
) -> Result<Json<SpaceInfo>, ApiError> {
    let space = SpaceRepository::new(&state.db)
        .get_space_by_id(space_id)
        .await?
        .ok_or_else(|| {
            ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Space not found")
                .with_details(serde_json::json!({ "space_id": space_id.to_string() }))
        })?;

    Ok(Json(space.into()))
}

/// Create a new space
#[utoipa::path(
    post,
    path = "/api/v1/spaces",
    security(("bearer_auth" = [])),
    request_body = SpaceNameDto,
    responses(
        (status = 201, description = "Space created", body = SpaceInfo, headers(
            ("Location", description = "URL of the created space"),
            ("X-Trace-Id", description = "Trace identifier for request correlation")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError)
    ),
    tag = "spaces"
)]
pub async fn create_space(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<SpaceNameDto>,
) -> Result<(StatusCode, [(&'static str, String); 2], Json<SpaceInfo>), ApiError> {
    user.require_inventory_management()?;

    let trace_id = Uuid::new_v4().to_string();

    let space = SpaceRepository::new(&state.db)
        .create_space(CreateSpaceRequest { name: request.name })
        .await?;

    let location_header = format!("/api/v1/spaces/{}", space.id);

    Ok((
        StatusCode::CREATED,
        [("Location", location_header), ("X-Trace-Id", trace_id)],
        Json(space.into()),
    ))
}

/// Rename a space
#[utoipa::path(
    put,
    path = "/api/v1/spaces/{id}",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Space UUID")
    ),
    request_body = SpaceNameDto,
    responses(
        (status = 200, description = "Space updated", body = SpaceInfo),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Space not found", body = ApiError)
    ),
    tag = "spaces"
)]
pub async fn update_space(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(space_id): Path<Uuid>,
    Json(request): Json<SpaceNameDto>,
) -> Result<Json<SpaceInfo>, ApiError> {
    user.require_inventory_management()?;

    let space = SpaceRepository::new(&state.db)
        .update_space_name(space_id, request.name)
        .await?;

    Ok(Json(space.into()))
}

/// Delete a space
///
/// Clients located in the space are detached, not deleted.
#[utoipa::path(
    delete,
    path = "/api/v1/spaces/{id}",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Space UUID")
    ),
    responses(
        (status = 204, description = "Space deleted"),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Space not found", body = ApiError)
    ),
    tag = "spaces"
)]
pub async fn delete_space(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(space_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    user.require_inventory_management()?;

    SpaceRepository::new(&state.db).delete_space(space_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
