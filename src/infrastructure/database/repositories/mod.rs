//! Database repository implementations
//!
//! One generic SeaORM repository serves every catalog entity; users get an
//! extra lookup repository for the identity service.

pub mod crud_repository;
pub mod user_repository;

pub use crud_repository::SeaOrmRepository;
pub use user_repository::UserRepository;

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;

/// Unique-constraint violations become `Conflict`; everything else is a
/// storage failure.
pub(crate) fn db_err(entity: &'static str) -> impl Fn(DbErr) -> DomainError {
    move |e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::Conflict(format!("{} already exists", entity))
        }
        _ => DomainError::Storage(e),
    }
}
