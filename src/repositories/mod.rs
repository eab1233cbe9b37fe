//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM
//! operations for database entities, providing a clean API for data access.

pub mod client;
pub mod net_address;
pub mod session;
pub mod space;
pub mod user;

pub use client::{ClientRepository, CreateClientRequest, UpdateClientRequest};
pub use net_address::{CreateNetAddressRequest, NetAddressRepository, UpdateNetAddressRequest};
pub use session::SessionRepository;
pub use space::{CreateSpaceRequest, SpaceRepository};
pub use user::{CreateUserRequest, UserRepository};
