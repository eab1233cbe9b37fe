//! Database seeding functionality
//!
//! This module provides functionality to seed the database with initial
//! data. Currently that is the bootstrap admin account.

pub mod admin;

pub use admin::seed_admin_user;
