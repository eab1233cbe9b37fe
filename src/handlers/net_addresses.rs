//! # Network Address API Handlers
//!
//! CRUD endpoints for network addresses. Creation takes the address only;
//! client assignment happens through update.

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::handlers::{to_rfc3339, validate_paging};
use crate::repositories::{
    CreateNetAddressRequest, NetAddressRepository, UpdateNetAddressRequest,
};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Query parameters for address listing
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListNetAddressesQuery {
    /// Maximum number of addresses to return (default: 50, max: 100)
    pub limit: Option<i64>,
    /// Number of addresses to skip (default: 0)
    pub offset: Option<i64>,
}

/// Request payload for creating a network address
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateNetAddressDto {
    /// IPv4 or IPv6 address
    #[schema(example = "10.0.5.17")]
    pub ip_add: String,
}

/// Request payload for updating a network address
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateNetAddressDto {
    #[schema(example = "10.0.5.17")]
    pub ip_add: String,
    /// Client assignment; null detaches the address
    #[schema(value_type = Option<String>)]
    pub client_id: Option<Uuid>,
}

/// Network address information for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NetAddressInfo {
    /// Unique identifier for the address
    #[schema(value_type = String)]
    pub id: Uuid,
    /// IPv4 or IPv6 address
    pub ip_add: String,
    /// Client the address is assigned to, if any
    #[schema(value_type = Option<String>)]
    pub client_id: Option<Uuid>,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Last-update timestamp (ISO 8601)
    pub updated_at: String,
}

impl From<crate::models::net_address::Model> for NetAddressInfo {
    fn from(model: crate::models::net_address::Model) -> Self {
        Self {
            id: model.id,
            ip_add: model.ip_add,
            client_id: model.client_id,
            created_at: to_rfc3339(model.created_at),
            updated_at: to_rfc3339(model.updated_at),
        }
    }
}

/// Response wrapper for address listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NetAddressesResponse {
    /// Addresses ordered by ip_add
    pub net_addresses: Vec<NetAddressInfo>,
    pub limit: i64,
    pub offset: i64,
}

/// List network addresses ordered by ip_add
#[utoipa::path(
    get,
    path = "/api/v1/net-addresses",
    security(("bearer_auth" = [])),
    params(ListNetAddressesQuery),
    responses(
        (status = 200, description = "List of network addresses", body = NetAddressesResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Missing or invalid session token", body = ApiError)
    ),
    tag = "net-addresses"
)]
pub async fn list_net_addresses(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ListNetAddressesQuery>,
) -> Result<Json<NetAddressesResponse>, ApiError> {
    let (limit, offset) = validate_paging(query.limit, query.offset)?;

    let addresses = NetAddressRepository::new(&state.db)
        .list_net_addresses(limit as u64, offset as u64)
        .await?;

    Ok(Json(NetAddressesResponse {
        net_addresses: addresses.into_iter().map(NetAddressInfo::from).collect(),
        limit,
        offset,
    }))
}

/// Get a network address by ID
#[utoipa::path(
    get,
    path = "/api/v1/net-addresses/{id}",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Network address UUID")
    ),
    responses(
        (status = 200, description = "Address retrieved", body = NetAddressInfo),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 404, description = "Address not found", body = ApiError)
    ),
    tag = "net-addresses"
)]
pub async fn get_net_address(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(address_id): Path<Uuid>,
) -> Result<Json<NetAddressInfo>, ApiError> {
    let address = NetAddressRepository::new(&state.db)
        .get_net_address_by_id(address_id)
        .await?
        .ok_or_else(|| {
            ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Network address not found")
                .with_details(serde_json::json!({ "address_id": address_id.to_string() }))
        })?;

    Ok(Json(address.into()))
}

/// Create a new network address
///
/// The client assignment always starts out null; assign through update.
#[utoipa::path(
    post,
    path = "/api/v1/net-addresses",
    security(("bearer_auth" = [])),
    request_body = CreateNetAddressDto,
    responses(
        (status = 201, description = "Address created", body = NetAddressInfo, headers(
            ("Location", description = "URL of the created address"),
            ("X-Trace-Id", description = "Trace identifier for request correlation")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError)
    ),
    tag = "net-addresses"
)]
pub async fn create_net_address(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateNetAddressDto>,
) -> Result<(StatusCode, [(&'static str, String); 2], Json<NetAddressInfo>), ApiError> {
    user.require_inventory_management()?;

    let trace_id = Uuid::new_v4().to_string();

    let address = NetAddressRepository::new(&state.db)
        .create_net_address(CreateNetAddressRequest {
            ip_add: request.ip_add,
        })
        .await?;

    let location_header = format!("/api/v1/net-addresses/{}", address.id);

    Ok((
        StatusCode::CREATED,
        [("Location", location_header), ("X-Trace-Id", trace_id)],
        Json(address.into()),
    ))
}

/// Update an address's IP and client assignment
#[utoipa::path(
    put,
    path = "/api/v1/net-addresses/{id}",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Network address UUID")
    ),
    request_body = UpdateNetAddressDto,
    responses(
        (status = 200, description = "Address updated", body = NetAddressInfo),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Address not found", body = ApiError)
    ),
    tag = "net-addresses"
)]
pub async fn update_net_address(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(address_id): Path<Uuid>,
    Json(request): Json<UpdateNetAddressDto>,
) -> Result<Json<NetAddressInfo>, ApiError> {
    user.require_inventory_management()?;

    let address = NetAddressRepository::new(&state.db)
        .update_net_address(
            address_id,
            UpdateNetAddressRequest {
                ip_add: request.ip_add,
                client_id: request.client_id,
            },
        )
        .await?;

    Ok(Json(address.into()))
}

/// Delete a network address
#[utoipa::path(
    delete,
    path = "/api/v1/net-addresses/{id}",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Network address UUID")
    ),
    responses(
        (status = 204, description = "Address deleted"),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Address not found", body = ApiError)
    ),
    tag = "net-addresses"
)]
pub async fn delete_net_address(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(address_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    user.require_inventory_management()?;

    NetAddressRepository::new(&state.db)
        .delete_net_address(address_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
