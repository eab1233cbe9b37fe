//! Database migrations for HiveQueen.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_06_01_000001_create_spaces;
mod m2025_06_01_000002_create_clients;
mod m2025_06_01_000003_create_net_addresses;
mod m2025_06_10_000100_create_users;
mod m2025_06_10_000200_create_sessions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_06_01_000001_create_spaces::Migration),
            Box::new(m2025_06_01_000002_create_clients::Migration),
            Box::new(m2025_06_01_000003_create_net_addresses::Migration),
            Box::new(m2025_06_10_000100_create_users::Migration),
            Box::new(m2025_06_10_000200_create_sessions::Migration),
        ]
    }
}
