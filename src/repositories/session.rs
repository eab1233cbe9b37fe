//! # Session Repository
//!
//! This module contains the repository implementation for login sessions.
//! Tokens are minted by the auth layer; this repository only persists and
//! resolves them.

use crate::error::RepositoryError;
use crate::models::session::{
    ActiveModel as SessionActiveModel, Column as SessionColumn, Entity as Session,
    Model as SessionModel,
};
use crate::models::user::Model as UserModel;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};
use uuid::Uuid;

/// Repository for Session database operations
pub struct SessionRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SessionRepository<'a> {
    /// Create a new SessionRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open a session for the given user with the given token and TTL
    pub async fn create_session(
        &self,
        user_id: Uuid,
        token: String,
        ttl_seconds: u64,
    ) -> Result<SessionModel, RepositoryError> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(ttl_seconds as i64);

        let session = SessionActiveModel {
            id: Set(Uuid::new_v4()),
            token: Set(token),
            user_id: Set(user_id),
            created_at: Set(now.into()),
            expires_at: Set(expires_at.into()),
        };

        let result = session
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Resolve a token to its session and user. Expired sessions are treated
    /// as absent (and removed on the way out).
    pub async fn resolve_token(
        &self,
        token: &str,
    ) -> Result<Option<(SessionModel, UserModel)>, RepositoryError> {
        let found = Session::find()
            .filter(SessionColumn::Token.eq(token))
            .find_also_related(crate::models::User)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        let Some((session, user)) = found else {
            return Ok(None);
        };

        if session.expires_at < Utc::now() {
            // Expired rows are garbage; drop them as they are discovered
            session
                .delete(self.db)
                .await
                .map_err(RepositoryError::database_error)?;
            return Ok(None);
        }

        let Some(user) = user else {
            return Ok(None);
        };

        Ok(Some((session, user)))
    }

    /// Revoke a session by token. Revoking an unknown token is a no-op.
    pub async fn delete_by_token(&self, token: &str) -> Result<(), RepositoryError> {
        Session::delete_many()
            .filter(SessionColumn::Token.eq(token))
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }

    /// Remove all expired sessions.
    pub async fn purge_expired(&self) -> Result<u64, RepositoryError> {
        let result = Session::delete_many()
            .filter(SessionColumn::ExpiresAt.lt(Utc::now()))
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use crate::repositories::{CreateUserRequest, UserRepository};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup() -> (DatabaseConnection, Uuid) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let user = UserRepository::new(&db)
            .create_user(CreateUserRequest {
                username: "tester".to_string(),
                password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
                role: UserRole::Member,
            })
            .await
            .unwrap();

        (db, user.id)
    }

    #[tokio::test]
    async fn test_resolve_valid_token() {
        let (db, user_id) = setup().await;
        let repo = SessionRepository::new(&db);

        repo.create_session(user_id, "tok-1".to_string(), 3600)
            .await
            .unwrap();

        let resolved = repo.resolve_token("tok-1").await.unwrap();
        let (session, user) = resolved.expect("session should resolve");
        assert_eq!(session.user_id, user_id);
        assert_eq!(user.id, user_id);

        assert!(repo.resolve_token("tok-unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_token_does_not_resolve() {
        let (db, user_id) = setup().await;
        let repo = SessionRepository::new(&db);

        // TTL of zero expires immediately
        repo.create_session(user_id, "tok-stale".to_string(), 0)
            .await
            .unwrap();

        assert!(repo.resolve_token("tok-stale").await.unwrap().is_none());

        // The expired row was dropped during resolution
        assert_eq!(repo.purge_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let (db, user_id) = setup().await;
        let repo = SessionRepository::new(&db);

        repo.create_session(user_id, "tok-2".to_string(), 3600)
            .await
            .unwrap();
        repo.delete_by_token("tok-2").await.unwrap();

        assert!(repo.resolve_token("tok-2").await.unwrap().is_none());

        // Revoking again is harmless
        repo.delete_by_token("tok-2").await.unwrap();
    }

    #[tokio::test]
    async fn test_deleting_user_cascades_sessions() {
        let (db, user_id) = setup().await;
        let repo = SessionRepository::new(&db);

        repo.create_session(user_id, "tok-3".to_string(), 3600)
            .await
            .unwrap();

        UserRepository::new(&db).delete_user(user_id).await.unwrap();

        assert!(repo.resolve_token("tok-3").await.unwrap().is_none());
    }
}
