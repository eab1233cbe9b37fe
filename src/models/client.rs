//! Client entity model
//!
//! This module contains the SeaORM entity model for the clients table, which
//! stores the tracked lab machines/entities. A client may be placed in at
//! most one space; deleting the space detaches the client (SET NULL).

use super::space::Entity as Space;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Client entity representing a tracked lab machine (e.g. "it001")
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Unique identifier for the client (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Host name for the client
    pub name: String,

    /// DNS domain the client lives in (e.g. "lab.it.uc3m.es")
    pub domain: String,

    /// Space this client is located in (nullable; cleared when the space is
    /// deleted)
    pub space_id: Option<Uuid>,

    /// Timestamp when the client was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the client was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Space",
        from = "Column::SpaceId",
        to = "super::space::Column::Id"
    )]
    Space,
    #[sea_orm(has_many = "super::net_address::Entity")]
    NetAddress,
}

impl Related<Space> for Entity {
    fn to() -> RelationDef {
        Relation::Space.def()
    }
}

impl Related<super::net_address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NetAddress.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
