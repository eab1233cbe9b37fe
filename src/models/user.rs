//! User entity model
//!
//! This module contains the SeaORM entity model for the users table plus the
//! role discriminator used by the permission checks.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User account
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Login name (unique)
    pub username: String,

    /// Argon2id PHC-format password hash
    pub password_hash: String,

    /// Role discriminator: admin|groupmng|member
    pub user_type: String,

    /// Timestamp when the user was created
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session::Entity")]
    Session,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// User roles recognized by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access, including user administration
    Admin,
    /// Group manager: may manage the lab inventory
    Groupmng,
    /// Read-only account
    Member,
}

impl UserRole {
    /// Parse a stored `user_type` value. Unknown values are treated as the
    /// least-privileged role.
    pub fn from_user_type(user_type: &str) -> Self {
        match user_type {
            "admin" => UserRole::Admin,
            "groupmng" => UserRole::Groupmng,
            _ => UserRole::Member,
        }
    }

    /// The string stored in the `user_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Groupmng => "groupmng",
            UserRole::Member => "member",
        }
    }

    /// Whether this role may create, update, or delete inventory entities
    /// (clients, spaces, net addresses).
    pub fn can_manage_inventory(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Groupmng)
    }
}

impl Model {
    /// The parsed role of this user.
    pub fn role(&self) -> UserRole {
        UserRole::from_user_type(&self.user_type)
    }
}
