//! Domain layer
//!
//! Request payloads, the repository ports and the error taxonomy. Nothing in
//! here knows about HTTP; storage types only appear through `DbErr`.

pub mod catalog;
pub mod error;
pub mod query;
pub mod repository;
pub mod user;

pub use error::{DomainError, DomainResult, FieldKind};
pub use query::{FieldMap, ListQuery, Search, SearchTarget};
pub use repository::CrudRepository;
pub use user::{
    CreateUserDto, LoginDto, RegisterUserDto, UpdateUserDto, User, UserRepositoryInterface,
};
