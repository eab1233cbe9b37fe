//! # Data Models
//!
//! This module contains all the data models used throughout HiveQueen.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod client;
pub mod net_address;
pub mod session;
pub mod space;
pub mod user;

pub use client::Entity as Client;
pub use net_address::Entity as NetAddress;
pub use session::Entity as Session;
pub use space::Entity as Space;
pub use user::Entity as User;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "hivequeen".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
