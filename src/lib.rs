//! # toge-api
//!
//! CRUD backend for a small game-wiki catalog: persons, nations, versions,
//! artifact sets, artifacts, spaces and user accounts, with paging, sorting
//! and keyword search over every collection.
//!
//! ## Architecture
//!
//! - **domain**: error model, list-query validation, repository ports, DTOs
//! - **application**: generic CRUD service and the identity service
//! - **infrastructure**: SeaORM entities and repositories, the migration
//!   runner, JWT/password crypto, shutdown handling
//! - **interfaces**: axum router, handlers, middleware and OpenAPI docs
//! - **shared**: paging request/response types

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, resolve_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiContext};
