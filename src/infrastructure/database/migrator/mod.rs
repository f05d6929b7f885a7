//! Database migrations module
//!
//! Schema steps live in one file each; [`definitions`] is the single ordered
//! list the [`MigrationRunner`] walks.

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_person;
mod m20240101_000003_create_nation;
mod m20240101_000004_create_version;
mod m20240101_000005_create_artifact_set;
mod m20240101_000006_create_artifact;
mod m20240101_000007_create_space;

pub mod runner;

pub use runner::{format_status, MigrationDefinition, MigrationRunner};

/// Definition for a step module, checksummed over the module's source file
macro_rules! step {
    ($module:ident, $description:literal) => {
        MigrationDefinition::new($module::Migration, $description)
            .with_source(include_str!(concat!(stringify!($module), ".rs")))
    };
}

/// All schema steps in the order they must be applied
pub fn definitions() -> Vec<MigrationDefinition> {
    vec![
        step!(m20240101_000001_create_users, "Create users table"),
        step!(m20240101_000002_create_person, "Create person table"),
        step!(m20240101_000003_create_nation, "Create nation table"),
        step!(m20240101_000004_create_version, "Create version table"),
        step!(m20240101_000005_create_artifact_set, "Create artifact_set table"),
        step!(m20240101_000006_create_artifact, "Create artifact table"),
        step!(m20240101_000007_create_space, "Create space table"),
    ]
}
