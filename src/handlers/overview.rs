//! # Overview Handler
//!
//! The landing endpoint of the original application: counts of the main
//! inventory entities for the signed-in user.

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::repositories::{ClientRepository, NetAddressRepository, SpaceRepository};
use crate::server::AppState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Entity counts shown on the overview page
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OverviewResponse {
    /// Number of tracked clients
    pub num_clients: i64,
    /// Number of spaces
    pub num_spaces: i64,
    /// Number of network addresses
    pub num_addresses: i64,
}

/// Entity counts for the signed-in user
#[utoipa::path(
    get,
    path = "/api/v1/overview",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Entity counts", body = OverviewResponse),
        (status = 401, description = "Missing or invalid session token", body = ApiError)
    ),
    tag = "overview"
)]
pub async fn overview(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<OverviewResponse>, ApiError> {
    let num_clients = ClientRepository::new(&state.db).get_client_count().await?;
    let num_spaces = SpaceRepository::new(&state.db).get_space_count().await?;
    let num_addresses = NetAddressRepository::new(&state.db)
        .get_net_address_count()
        .await?;

    Ok(Json(OverviewResponse {
        num_clients,
        num_spaces,
        num_addresses,
    }))
}
