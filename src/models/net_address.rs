//! Network address entity model
//!
//! This module contains the SeaORM entity model for the net_addresses table.
//! Addresses are stored as validated text so the entity is portable across
//! Postgres and SQLite; deleting the owning client detaches the address.

use super::client::Entity as Client;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Network address entity, optionally assigned to a client
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "net_addresses")]
pub struct Model {
    /// Unique identifier for the address (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// IPv4 or IPv6 address in textual form (validated on write)
    pub ip_add: String,

    /// Client this address is assigned to (nullable; cleared when the client
    /// is deleted)
    pub client_id: Option<Uuid>,

    /// Timestamp when the address was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the address was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Client",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
}

impl Related<Client> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
