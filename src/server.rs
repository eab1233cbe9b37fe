//! # Server Configuration
//!
//! This module contains the server setup and configuration for HiveQueen:
//! shared state, router assembly, and the OpenAPI document.

use std::sync::Arc;

use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::auth::auth_middleware;
use crate::config::AppConfig;
use crate::handlers;
use crate::telemetry::{self, TraceContext};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Self {
        Self {
            config: Arc::new(config),
            db,
        }
    }
}

/// Middleware that assigns each request a trace ID and makes it available
/// both as a request extension and through task-local storage.
async fn trace_context_middleware(mut request: Request, next: Next) -> Response {
    let context = TraceContext {
        trace_id: Uuid::new_v4().to_string(),
    };

    request.extensions_mut().insert(context.clone());
    telemetry::with_trace_context(context, next.run(request)).await
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    // Everything behind the session gate
    let protected = Router::new()
        .route("/api/v1/overview", get(handlers::overview::overview))
        .route("/api/v1/auth/logout", post(handlers::accounts::logout))
        .route(
            "/api/v1/clients",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route(
            "/api/v1/clients/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        .route(
            "/api/v1/spaces",
            get(handlers::spaces::list_spaces).post(handlers::spaces::create_space),
        )
        .route(
            "/api/v1/spaces/{id}",
            get(handlers::spaces::get_space)
                .put(handlers::spaces::update_space)
                .delete(handlers::spaces::delete_space),
        )
        .route(
            "/api/v1/net-addresses",
            get(handlers::net_addresses::list_net_addresses)
                .post(handlers::net_addresses::create_net_address),
        )
        .route(
            "/api/v1/net-addresses/{id}",
            get(handlers::net_addresses::get_net_address)
                .put(handlers::net_addresses::update_net_address)
                .delete(handlers::net_addresses::delete_net_address),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route(
            "/api/v1/auth/signup/groupmng",
            post(handlers::accounts::signup_groupmng),
        )
        .route("/api/v1/auth/login", post(handlers::accounts::login))
        .merge(protected)
        .layer(middleware::from_fn(trace_context_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;
    let profile = config.profile.clone();

    let state = AppState::new(config, db);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on: {}", addr);
    tracing::info!("Running in profile: {}", profile);

    axum::serve(listener, app).await?;

    Ok(())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("opaque")
                    .build(),
            ),
        );
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::accounts::signup_groupmng,
        crate::handlers::accounts::login,
        crate::handlers::accounts::logout,
        crate::handlers::overview::overview,
        crate::handlers::clients::list_clients,
        crate::handlers::clients::get_client,
        crate::handlers::clients::create_client,
        crate::handlers::clients::update_client,
        crate::handlers::clients::delete_client,
        crate::handlers::spaces::list_spaces,
        crate::handlers::spaces::get_space,
        crate::handlers::spaces::create_space,
        crate::handlers::spaces::update_space,
        crate::handlers::spaces::delete_space,
        crate::handlers::net_addresses::list_net_addresses,
        crate::handlers::net_addresses::get_net_address,
        crate::handlers::net_addresses::create_net_address,
        crate::handlers::net_addresses::update_net_address,
        crate::handlers::net_addresses::delete_net_address,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::handlers::HealthStatus,
            crate::handlers::accounts::CredentialsDto,
            crate::handlers::accounts::SessionResponseDto,
            crate::handlers::accounts::UserInfo,
            crate::handlers::overview::OverviewResponse,
            crate::handlers::clients::CreateClientDto,
            crate::handlers::clients::UpdateClientDto,
            crate::handlers::clients::ClientInfo,
            crate::handlers::clients::ClientsResponse,
            crate::handlers::spaces::SpaceNameDto,
            crate::handlers::spaces::SpaceInfo,
            crate::handlers::spaces::SpacesResponse,
            crate::handlers::net_addresses::CreateNetAddressDto,
            crate::handlers::net_addresses::UpdateNetAddressDto,
            crate::handlers::net_addresses::NetAddressInfo,
            crate::handlers::net_addresses::NetAddressesResponse,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "HiveQueen API",
        description = "API for tracking lab clients, spaces, and network addresses",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
