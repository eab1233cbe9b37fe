//! # Network Address Repository
//!
//! This module contains the repository implementation for NetAddress
//! entities. Addresses must parse as IPv4 or IPv6; assignment to a client is
//! optional and validated against the clients table.

use crate::error::RepositoryError;
use crate::models::client::Entity as Client;
use crate::models::net_address::{
    ActiveModel as NetAddressActiveModel, Column as NetAddressColumn, Entity as NetAddress,
    Model as NetAddressModel,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryOrder, QuerySelect, Set,
};
use std::net::IpAddr;
use uuid::Uuid;

/// Request data for creating a new network address
#[derive(Debug, Clone)]
pub struct CreateNetAddressRequest {
    /// IPv4 or IPv6 address in textual form
    pub ip_add: String,
}

/// Request data for updating a network address
#[derive(Debug, Clone)]
pub struct UpdateNetAddressRequest {
    pub ip_add: String,
    /// New client assignment; `None` detaches the address
    pub client_id: Option<Uuid>,
}

/// Repository for NetAddress database operations
pub struct NetAddressRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> NetAddressRepository<'a> {
    /// Create a new NetAddressRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new network address. The client assignment always starts out
    /// null; use [`update_net_address`](Self::update_net_address) to assign.
    pub async fn create_net_address(
        &self,
        request: CreateNetAddressRequest,
    ) -> Result<NetAddressModel, RepositoryError> {
        let ip_add = normalize_ip(&request.ip_add)?;

        let now = Utc::now();
        let address = NetAddressActiveModel {
            id: Set(Uuid::new_v4()),
            ip_add: Set(ip_add),
            client_id: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let result = address
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Get network address by ID
    pub async fn get_net_address_by_id(
        &self,
        address_id: Uuid,
    ) -> Result<Option<NetAddressModel>, RepositoryError> {
        let address = NetAddress::find_by_id(address_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(address)
    }

    /// List network addresses ordered by ip_add
    pub async fn list_net_addresses(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<NetAddressModel>, RepositoryError> {
        let addresses = NetAddress::find()
            .order_by_asc(NetAddressColumn::IpAdd)
            .offset(offset)
            .limit(limit)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(addresses)
    }

    /// Update an address's IP and client assignment
    pub async fn update_net_address(
        &self,
        address_id: Uuid,
        request: UpdateNetAddressRequest,
    ) -> Result<NetAddressModel, RepositoryError> {
        let ip_add = normalize_ip(&request.ip_add)?;

        if let Some(client_id) = request.client_id {
            self.ensure_client_exists(client_id).await?;
        }

        let address = self
            .get_net_address_by_id(address_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Network address not found".to_string()))?;

        let mut active_address = address.into_active_model();
        active_address.ip_add = Set(ip_add);
        active_address.client_id = Set(request.client_id);
        active_address.updated_at = Set(Utc::now().into());

        let result = active_address
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Delete a network address
    pub async fn delete_net_address(&self, address_id: Uuid) -> Result<(), RepositoryError> {
        let address = NetAddress::find_by_id(address_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::NotFound("Network address not found".to_string()))?;

        address
            .delete(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }

    /// Get network address count
    pub async fn get_net_address_count(&self) -> Result<i64, RepositoryError> {
        let count = NetAddress::find()
            .count(self.db)
            .await
            .map_err(RepositoryError::database_error)? as i64;

        Ok(count)
    }

    async fn ensure_client_exists(&self, client_id: Uuid) -> Result<(), RepositoryError> {
        let exists = Client::find_by_id(client_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .is_some();

        if exists {
            Ok(())
        } else {
            Err(RepositoryError::field_validation_error(
                "client_id",
                "Referenced client does not exist",
            ))
        }
    }
}

/// Parse and canonicalize a textual IP address.
fn normalize_ip(raw: &str) -> Result<String, RepositoryError> {
    raw.trim()
        .parse::<IpAddr>()
        .map(|ip| ip.to_string())
        .map_err(|_| {
            RepositoryError::field_validation_error("ip_add", "Must be a valid IPv4 or IPv6 address")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{ClientRepository, CreateClientRequest};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_create_net_address_success() {
        let db = setup_test_db().await;
        let repo = NetAddressRepository::new(&db);

        let address = repo
            .create_net_address(CreateNetAddressRequest {
                ip_add: "10.0.5.17".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(address.ip_add, "10.0.5.17");
        assert_eq!(address.client_id, None);
    }

    #[tokio::test]
    async fn test_malformed_ip_is_rejected() {
        let db = setup_test_db().await;
        let repo = NetAddressRepository::new(&db);

        for bad in ["10.0.5", "300.1.1.1", "not-an-ip", ""] {
            let result = repo
                .create_net_address(CreateNetAddressRequest {
                    ip_add: bad.to_string(),
                })
                .await;
            assert!(
                matches!(result, Err(RepositoryError::Validation { .. })),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_ipv6_is_canonicalized() {
        let db = setup_test_db().await;
        let repo = NetAddressRepository::new(&db);

        let address = repo
            .create_net_address(CreateNetAddressRequest {
                ip_add: "2001:0db8:0000:0000:0000:0000:0000:0001".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(address.ip_add, "2001:db8::1");
    }

    #[tokio::test]
    async fn test_assign_and_detach_client() {
        let db = setup_test_db().await;
        let repo = NetAddressRepository::new(&db);
        let client_repo = ClientRepository::new(&db);

        let client = client_repo
            .create_client(CreateClientRequest {
                name: "it001".to_string(),
                domain: None,
            })
            .await
            .unwrap();

        let address = repo
            .create_net_address(CreateNetAddressRequest {
                ip_add: "10.0.5.17".to_string(),
            })
            .await
            .unwrap();

        let assigned = repo
            .update_net_address(
                address.id,
                UpdateNetAddressRequest {
                    ip_add: "10.0.5.17".to_string(),
                    client_id: Some(client.id),
                },
            )
            .await
            .unwrap();
        assert_eq!(assigned.client_id, Some(client.id));

        // Deleting the client nulls the reference, keeping the address
        client_repo.delete_client(client.id).await.unwrap();
        let survivor = repo
            .get_net_address_by_id(address.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(survivor.client_id, None);
    }

    #[tokio::test]
    async fn test_list_ordered_by_ip() {
        let db = setup_test_db().await;
        let repo = NetAddressRepository::new(&db);

        for ip in ["10.0.5.3", "10.0.5.1", "10.0.5.2"] {
            repo.create_net_address(CreateNetAddressRequest {
                ip_add: ip.to_string(),
            })
            .await
            .unwrap();
        }

        let addresses = repo.list_net_addresses(50, 0).await.unwrap();
        let ips: Vec<&str> = addresses.iter().map(|a| a.ip_add.as_str()).collect();
        assert_eq!(ips, vec!["10.0.5.1", "10.0.5.2", "10.0.5.3"]);
    }
}
