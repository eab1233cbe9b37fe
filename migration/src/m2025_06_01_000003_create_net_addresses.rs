//! Migration to create the net_addresses table.
//!
//! Network addresses are stored as validated text so the schema works the
//! same on Postgres and SQLite. Deleting a client detaches its addresses.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NetAddresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NetAddresses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NetAddresses::IpAdd).text().not_null())
                    .col(ColumnDef::new(NetAddresses::ClientId).uuid().null())
                    .col(
                        ColumnDef::new(NetAddresses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(NetAddresses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_net_addresses_client_id")
                            .from(NetAddresses::Table, NetAddresses::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Addresses are listed by ip_add
        manager
            .create_index(
                Index::create()
                    .name("idx_net_addresses_ip_add")
                    .table(NetAddresses::Table)
                    .col(NetAddresses::IpAdd)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_net_addresses_client_id")
                    .table(NetAddresses::Table)
                    .col(NetAddresses::ClientId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_net_addresses_ip_add").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_net_addresses_client_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(NetAddresses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum NetAddresses {
    Table,
    Id,
    IpAdd,
    ClientId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
}
