//! Admin account seeding
//!
//! Creates the initial admin account from configuration when no admin
//! exists yet, so a fresh deployment has a way in.

use anyhow::Result;
use sea_orm::DatabaseConnection;

use crate::auth;
use crate::config::AppConfig;
use crate::models::user::UserRole;
use crate::repositories::{CreateUserRequest, UserRepository};

/// Seeds the bootstrap admin account.
///
/// A no-op when the credentials are not configured or an admin already
/// exists, so running it on every startup is safe.
pub async fn seed_admin_user(config: &AppConfig, db: &DatabaseConnection) -> Result<()> {
    let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password)
    else {
        log::info!("No admin credentials configured, skipping admin seeding");
        return Ok(());
    };

    let repo = UserRepository::new(db);

    if repo.role_exists(UserRole::Admin).await? {
        log::info!("An admin account already exists, skipping admin seeding");
        return Ok(());
    }

    log::info!("Creating bootstrap admin account: {}", username);

    let password_hash = auth::hash_password(password)
        .map_err(|e| anyhow::anyhow!("failed to hash admin password: {}", e.message))?;

    repo.create_user(CreateUserRequest {
        username: username.clone(),
        password_hash,
        role: UserRole::Admin,
    })
    .await?;

    log::info!("Admin seeding completed successfully");

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
    async fn test_seeding_without_credentials_is_noop() {
        let db = setup_test_db().await;
        let config = AppConfig::default();

        seed_admin_user(&config, &db).await.unwrap();

        let repo = UserRepository::new(&db);
        assert!(!repo.role_exists(UserRole::Admin).await.unwrap());
    }

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let db = setup_test_db().await;
        let config = AppConfig {
            admin_username: Some("root".to_string()),
            admin_password: Some("swarm-mother-01".to_string()),
            ..Default::default()
        };

        seed_admin_user(&config, &db).await.unwrap();
        // Second run must not try to create a duplicate
        seed_admin_user(&config, &db).await.unwrap();

        let repo = UserRepository::new(&db);
        let admin = repo.find_by_username("root").await.unwrap().unwrap();
        assert_eq!(admin.user_type, "admin");
        assert!(auth::verify_password("swarm-mother-01", &admin.password_hash));
    }
}
