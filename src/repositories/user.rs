//! # User Repository
//!
//! This module contains the repository implementation for User entities,
//! backing sign-up, login, and the admin bootstrap.

use crate::error::RepositoryError;
use crate::models::user::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as User, Model as UserModel,
    UserRole,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

/// Request data for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    /// Login name (unique)
    pub username: String,
    /// Argon2id PHC-format password hash (hashing happens in the auth layer)
    pub password_hash: String,
    /// Role assigned to the account
    pub role: UserRole,
}

/// Repository for User database operations
pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new user. A duplicate username surfaces as a database
    /// unique-constraint violation.
    pub async fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<UserModel, RepositoryError> {
        let username = request.username.trim().to_string();
        validate_username(&username)?;

        let user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username),
            password_hash: Set(request.password_hash),
            user_type: Set(request.role.as_str().to_string()),
            created_at: Set(Utc::now().into()),
        };

        let result = user
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Get user by ID
    pub async fn get_user_by_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserModel>, RepositoryError> {
        let user = User::find_by_id(user_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(user)
    }

    /// Find a user by username
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserModel>, RepositoryError> {
        let user = User::find()
            .filter(UserColumn::Username.eq(username))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(user)
    }

    /// Check whether any user with the given role exists
    pub async fn role_exists(&self, role: UserRole) -> Result<bool, RepositoryError> {
        let count = User::find()
            .filter(UserColumn::UserType.eq(role.as_str()))
            .count(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(count > 0)
    }

    /// Delete a user; their sessions are removed by the database cascade
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), RepositoryError> {
        let result = User::delete_by_id(user_id)
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound("User not found".to_string()));
        }

        Ok(())
    }
}

fn validate_username(username: &str) -> Result<(), RepositoryError> {
    if username.is_empty() {
        return Err(RepositoryError::field_validation_error(
            "username",
            "Username cannot be empty",
        ));
    }

    if username.len() > 150 {
        return Err(RepositoryError::field_validation_error(
            "username",
            "Username cannot exceed 150 characters",
        ));
    }

    // Letters, digits and @ . + - _ (the classic auth-framework alphabet)
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(RepositoryError::field_validation_error(
            "username",
            "Username may only contain letters, digits, and @ . + - _",
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

    fn request(username: &str, role: UserRole) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = setup_test_db().await;
        let repo = UserRepository::new(&db);

        let created = repo
            .create_user(request("lab.manager", UserRole::Groupmng))
            .await
            .unwrap();
        assert_eq!(created.user_type, "groupmng");

        let found = repo.find_by_username("lab.manager").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(created.id));

        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let db = setup_test_db().await;
        let repo = UserRepository::new(&db);

        repo.create_user(request("dup", UserRole::Member))
            .await
            .unwrap();

        let result = repo.create_user(request("dup", UserRole::Member)).await;
        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }

    #[tokio::test]
    async fn test_username_alphabet() {
        let db = setup_test_db().await;
        let repo = UserRepository::new(&db);

        assert!(repo
            .create_user(request("user+tag@lab_1.example", UserRole::Member))
            .await
            .is_ok());

        let result = repo.create_user(request("bad name", UserRole::Member)).await;
        assert!(matches!(result, Err(RepositoryError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_role_exists() {
        let db = setup_test_db().await;
        let repo = UserRepository::new(&db);

        assert!(!repo.role_exists(UserRole::Admin).await.unwrap());

        repo.create_user(request("root", UserRole::Admin))
            .await
            .unwrap();

        assert!(repo.role_exists(UserRole::Admin).await.unwrap());
        assert!(!repo.role_exists(UserRole::Groupmng).await.unwrap());
    }
}
