//! # Bloglist Infrastructure
//!
//! Concrete implementations of the ports defined in `bloglist-core`.
//! This crate contains the database adapters and the auth services.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//!
//! The in-memory repositories are always available.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, InMemoryBlogRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use database::{PostgresBlogRepository, PostgresUserRepository};
