//! # Clients API Handlers
//!
//! This module contains handlers for the client CRUD endpoints. Reads need a
//! session; mutations additionally need the inventory-management permission.

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::handlers::{to_rfc3339, validate_paging};
use crate::repositories::{ClientRepository, CreateClientRequest, UpdateClientRequest};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Query parameters for client listing
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListClientsQuery {
    /// Maximum number of clients to return (default: 50, max: 100)
    pub limit: Option<i64>,
    /// Number of clients to skip (default: 0)
    pub offset: Option<i64>,
}

/// Request payload for creating a client
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateClientDto {
    /// Host name for the client (required, max 200 characters)
    #[schema(example = "it001")]
    pub name: String,
    /// DNS domain; defaults to "foo.com" when omitted
    #[schema(example = "lab.it.uc3m.es")]
    pub domain: Option<String>,
}

/// Request payload for updating a client
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateClientDto {
    #[schema(example = "it001")]
    pub name: String,
    #[schema(example = "lab.it.uc3m.es")]
    pub domain: String,
    /// Space assignment; null detaches the client
    #[schema(value_type = Option<String>)]
    pub space_id: Option<Uuid>,
}

/// Client information for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientInfo {
    /// Unique identifier for the client
    #[schema(value_type = String)]
    pub id: Uuid,
    /// Host name
    pub name: String,
    /// DNS domain
    pub domain: String,
    /// Space the client is located in, if any
    #[schema(value_type = Option<String>)]
    pub space_id: Option<Uuid>,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Last-update timestamp (ISO 8601)
    pub updated_at: String,
}

impl From<crate::models::client::Model> for ClientInfo {
    fn from(model: crate::models::client::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            domain: model.domain,
            space_id: model.space_id,
            created_at: to_rfc3339(model.created_at),
            updated_at: to_rfc3339(model.updated_at),
        }
    }
}

/// Response wrapper for client listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientsResponse {
    /// Clients ordered by (name, domain)
    pub clients: Vec<ClientInfo>,
    /// Effective limit applied to the listing
    pub limit: i64,
    /// Effective offset applied to the listing
    pub offset: i64,
}

/// List clients ordered by (name, domain)
#[utoipa::path(
    get,
    path = "/api/v1/clients",
    security(("bearer_auth" = [])),
    params(ListClientsQuery),
    responses(
        (status = 200, description = "List of clients", body = ClientsResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Missing or invalid session token", body = ApiError)
    ),
    tag = "clients"
)]
pub async fn list_clients(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ListClientsQuery>,
) -> Result<Json<ClientsResponse>, ApiError> {
    let (limit, offset) = validate_paging(query.limit, query.offset)?;

    let clients = ClientRepository::new(&state.db)
        .list_clients(limit as u64, offset as u64)
        .await?;

    Ok(Json(ClientsResponse {
        clients: clients.into_iter().map(ClientInfo::from).collect(),
        limit,
        offset,
    }))
}

/// Get a client by ID
#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Client UUID")
    ),
    responses(
        (status = 200, description = "Client retrieved", body = ClientInfo),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 404, description = "Client not found", body = ApiError)
    ),
    tag = "clients"
)]
pub async fn get_client(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(client_id): Path<Uuid>,
) -> Result<Json<ClientInfo>, ApiError> {
    let client = ClientRepository::new(&state.db)
        .get_client_by_id(client_id)
        .await?
        .ok_or_else(|| {
            ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Client not found")
                .with_details(serde_json::json!({ "client_id": client_id.to_string() }))
        })?;

    Ok(Json(client.into()))
}

/// Create a new client
///
/// The space assignment always starts out null; assign through update.
#[utoipa::path(
    post,
    path = "/api/v1/clients",
    security(("bearer_auth" = [])),
    request_body = CreateClientDto,
    responses(
        (status = 201, description = "Client created", body = ClientInfo, headers(
            ("Location", description = "URL of the created client"),
            ("X-Trace-Id", description = "Trace identifier for request correlation")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError)
    ),
    tag = "clients"
)]
pub async fn create_client(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateClientDto>,
) -> Result<(StatusCode, [(&'static str, String); 2], Json<ClientInfo>), ApiError> {
    user.require_inventory_management()?;

    let trace_id = Uuid::new_v4().to_string();

    let client = ClientRepository::new(&state.db)
        .create_client(CreateClientRequest {
            name: request.name,
            domain: request.domain,
        })
        .await?;

    let location_header = format!("/api/v1/clients/{}", client.id);

    Ok((
        StatusCode::CREATED,
        [("Location", location_header), ("X-Trace-Id", trace_id)],
        Json(client.into()),
    ))
}

/// Update a client's name, domain, and space assignment
#[utoipa::path(
    put,
    path = "/api/v1/clients/{id}",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Client UUID")
    ),
    request_body = UpdateClientDto,
    responses(
        (status = 200, description = "Client updated", body = ClientInfo),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Client not found", body = ApiError)
    ),
    tag = "clients"
)]
pub async fn update_client(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(client_id): Path<Uuid>,
    Json(request): Json<UpdateClientDto>,
) -> Result<Json<ClientInfo>, ApiError> {
    user.require_inventory_management()?;

    let client = ClientRepository::new(&state.db)
        .update_client(
            client_id,
            UpdateClientRequest {
                name: request.name,
                domain: request.domain,
                space_id: request.space_id,
            },
        )
        .await?;

    Ok(Json(client.into()))
}

/// Delete a client
///
/// Network addresses assigned to the client are detached, not deleted.
#[utoipa::path(
    delete,
    path = "/api/v1/clients/{id}",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Client UUID")
    ),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Client not found", body = ApiError)
    ),
    tag = "clients"
)]
pub async fn delete_client(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(client_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    user.require_inventory_management()?;

    ClientRepository::new(&state.db)
        .delete_client(client_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

