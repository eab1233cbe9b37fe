//! # Space Repository
//!
//! This module contains the repository implementation for Space entities,
//! providing CRUD operations for the physical locations clients live in.

use crate::error::RepositoryError;
use crate::models::space::{
    ActiveModel as SpaceActiveModel, Column as SpaceColumn, Entity as Space, Model as SpaceModel,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

/// Request data for creating a new space
#[derive(Debug, Clone)]
pub struct CreateSpaceRequest {
    /// Display name for the space
    pub name: String,
}

/// Repository for Space database operations
pub struct SpaceRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SpaceRepository<'a> {
    /// Create a new SpaceRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new space
    pub async fn create_space(
        &self,
        request: CreateSpaceRequest,
    ) -> Result<SpaceModel, RepositoryError> {
        let name = request.name.trim().to_string();
        validate_space_name(&name)?;

        let space = SpaceActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(Utc::now().into()),
        };

        let result = space
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Get space by ID
    pub async fn get_space_by_id(
        &self,
        space_id: Uuid,
    ) -> Result<Option<SpaceModel>, RepositoryError> {
        let space = Space::find_by_id(space_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(space)
    }

    /// List spaces ordered by name
    pub async fn list_spaces(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<SpaceModel>, RepositoryError> {
        let spaces = Space::find()
            .order_by_asc(SpaceColumn::Name)
            .offset(offset)
            .limit(limit)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(spaces)
    }

    /// Update a space's name
    pub async fn update_space_name(
        &self,
        space_id: Uuid,
        name: String,
    ) -> Result<SpaceModel, RepositoryError> {
        let name = name.trim().to_string();
        validate_space_name(&name)?;

        let space = self
            .get_space_by_id(space_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Space not found".to_string()))?;

        let mut active_space = space.into_active_model();
        active_space.name = Set(name);

        let result = active_space
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Delete a space. Dependent clients are detached by the database
    /// (their `space_id` foreign key is SET NULL), not deleted.
    pub async fn delete_space(&self, space_id: Uuid) -> Result<(), RepositoryError> {
        let space = Space::find_by_id(space_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::NotFound("Space not found".to_string()))?;

        space
            .delete(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }

    /// Check if a space exists
    pub async fn space_exists(&self, space_id: Uuid) -> Result<bool, RepositoryError> {
        let exists = Space::find_by_id(space_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .is_some();

        Ok(exists)
    }

    /// Get space count
    pub async fn get_space_count(&self) -> Result<i64, RepositoryError> {
        let count = Space::find()
            .count(self.db)
            .await
            .map_err(RepositoryError::database_error)? as i64;

        Ok(count)
    }
}

fn validate_space_name(name: &str) -> Result<(), RepositoryError> {
    if name.is_empty() {
        return Err(RepositoryError::field_validation_error(
            "name",
            "Space name cannot be empty",
        ));
    }

    if name.len() > 200 {
        return Err(RepositoryError::field_validation_error(
            "name",
            "Space name cannot exceed 200 characters",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_create_space_success() {
        let db = setup_test_db().await;
        let repo = SpaceRepository::new(&db);

        let space = repo
            .create_space(CreateSpaceRequest {
                name: "4.1B01".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(space.name, "4.1B01");
        assert!(space.created_at.timestamp() > 0);
    }

    #[tokio::test]
    async fn test_create_space_validation() {
        let db = setup_test_db().await;
        let repo = SpaceRepository::new(&db);

        let result = repo
            .create_space(CreateSpaceRequest {
                name: "   ".to_string(),
            })
            .await;
        assert!(matches!(
            result,
            Err(RepositoryError::Validation { .. })
        ));

        let result = repo
            .create_space(CreateSpaceRequest {
                name: "a".repeat(201),
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_spaces_ordered_by_name() {
        let db = setup_test_db().await;
        let repo = SpaceRepository::new(&db);

        for name in ["4.1B03", "4.1B01", "4.1B02"] {
            repo.create_space(CreateSpaceRequest {
                name: name.to_string(),
            })
            .await
            .unwrap();
        }

        let spaces = repo.list_spaces(50, 0).await.unwrap();
        let names: Vec<&str> = spaces.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["4.1B01", "4.1B02", "4.1B03"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_space() {
        let db = setup_test_db().await;
        let repo = SpaceRepository::new(&db);

        let created = repo
            .create_space(CreateSpaceRequest {
                name: "1.0A00".to_string(),
            })
            .await
            .unwrap();

        let updated = repo
            .update_space_name(created.id, "1.0A01".to_string())
            .await
            .unwrap();
        assert_eq!(updated.name, "1.0A01");

        repo.delete_space(created.id).await.unwrap();
        assert!(repo.get_space_by_id(created.id).await.unwrap().is_none());

        // Deleting again reports not-found
        let result = repo.delete_space(created.id).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_space_count() {
        let db = setup_test_db().await;
        let repo = SpaceRepository::new(&db);

        assert_eq!(repo.get_space_count().await.unwrap(), 0);

        repo.create_space(CreateSpaceRequest {
            name: "4.1B01".to_string(),
        })
        .await
        .unwrap();

        assert_eq!(repo.get_space_count().await.unwrap(), 1);
    }
}
