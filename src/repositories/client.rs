//! # Client Repository
//!
//! This module contains the repository implementation for Client entities,
//! providing CRUD operations for the tracked lab machines.

use crate::error::RepositoryError;
use crate::models::client::{
    ActiveModel as ClientActiveModel, Column as ClientColumn, Entity as Client,
    Model as ClientModel,
};
use crate::models::space::Entity as Space;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

/// Default domain applied when a create request omits one (the original
/// create form's initial value).
pub const DEFAULT_DOMAIN: &str = "foo.com";

/// Request data for creating a new client
#[derive(Debug, Clone)]
pub struct CreateClientRequest {
    /// Host name for the client
    pub name: String,
    /// DNS domain; defaults to [`DEFAULT_DOMAIN`] when absent
    pub domain: Option<String>,
}

/// Request data for updating a client
#[derive(Debug, Clone)]
pub struct UpdateClientRequest {
    pub name: String,
    pub domain: String,
    /// New space assignment; `None` detaches the client
    pub space_id: Option<Uuid>,
}

/// Repository for Client database operations
pub struct ClientRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ClientRepository<'a> {
    /// Create a new ClientRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new client. The space assignment always starts out null; use
    /// [`update_client`](Self::update_client) to place the client in a space.
    pub async fn create_client(
        &self,
        request: CreateClientRequest,
    ) -> Result<ClientModel, RepositoryError> {
        let name = request.name.trim().to_string();
        let domain = request
            .domain
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_DOMAIN.to_string());

        validate_client_name(&name)?;
        validate_client_domain(&domain)?;

        let now = Utc::now();
        let client = ClientActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            domain: Set(domain),
            space_id: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let result = client
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Get client by ID
    pub async fn get_client_by_id(
        &self,
        client_id: Uuid,
    ) -> Result<Option<ClientModel>, RepositoryError> {
        let client = Client::find_by_id(client_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(client)
    }

    /// List clients ordered by (name, domain)
    pub async fn list_clients(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<ClientModel>, RepositoryError> {
        let clients = Client::find()
            .order_by_asc(ClientColumn::Name)
            .order_by_asc(ClientColumn::Domain)
            .offset(offset)
            .limit(limit)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(clients)
    }

    /// Update a client's name, domain, and space assignment
    pub async fn update_client(
        &self,
        client_id: Uuid,
        request: UpdateClientRequest,
    ) -> Result<ClientModel, RepositoryError> {
        let name = request.name.trim().to_string();
        let domain = request.domain.trim().to_string();

        validate_client_name(&name)?;
        validate_client_domain(&domain)?;

        if let Some(space_id) = request.space_id {
            self.ensure_space_exists(space_id).await?;
        }

        let client = self
            .get_client_by_id(client_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Client not found".to_string()))?;

        let mut active_client = client.into_active_model();
        active_client.name = Set(name);
        active_client.domain = Set(domain);
        active_client.space_id = Set(request.space_id);
        active_client.updated_at = Set(Utc::now().into());

        let result = active_client
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Delete a client. Dependent net addresses are detached by the database
    /// (their `client_id` foreign key is SET NULL), not deleted.
    pub async fn delete_client(&self, client_id: Uuid) -> Result<(), RepositoryError> {
        let client = Client::find_by_id(client_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::NotFound("Client not found".to_string()))?;

        client
            .delete(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }

    /// Get client count
    pub async fn get_client_count(&self) -> Result<i64, RepositoryError> {
        let count = Client::find()
            .count(self.db)
            .await
            .map_err(RepositoryError::database_error)? as i64;

        Ok(count)
    }

    async fn ensure_space_exists(&self, space_id: Uuid) -> Result<(), RepositoryError> {
        let exists = Space::find_by_id(space_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .is_some();

        if exists {
            Ok(())
        } else {
            Err(RepositoryError::field_validation_error(
                "space_id",
                "Referenced space does not exist",
            ))
        }
    }
}

fn validate_client_name(name: &str) -> Result<(), RepositoryError> {
    if name.is_empty() {
        return Err(RepositoryError::field_validation_error(
            "name",
            "Client name cannot be empty",
        ));
    }

    if name.len() > 200 {
        return Err(RepositoryError::field_validation_error(
            "name",
            "Client name cannot exceed 200 characters",
        ));
    }

    Ok(())
}

fn validate_client_domain(domain: &str) -> Result<(), RepositoryError> {
    if domain.is_empty() {
        return Err(RepositoryError::field_validation_error(
            "domain",
            "Client domain cannot be empty",
        ));
    }

    if domain.len() > 200 {
        return Err(RepositoryError::field_validation_error(
            "domain",
            "Client domain cannot exceed 200 characters",
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(RepositoryError::field_validation_error(
            "domain",
            "Client domain may only contain letters, digits, dots, and hyphens",
        ));
    }

    Ok(())
}
