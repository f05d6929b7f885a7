//! User aggregate
//!
//! Contains the User model, DTOs, and repository interface.

pub mod model;
pub mod repository;

mod dto_create;
mod dto_login;
mod dto_update;

pub use model::User;

pub use dto_create::{CreateUserDto, RegisterUserDto};
pub use dto_login::LoginDto;
pub use dto_update::UpdateUserDto;

pub use repository::UserRepositoryInterface;
