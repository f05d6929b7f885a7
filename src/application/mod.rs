//! Application layer
//!
//! Use-case orchestration between the HTTP handlers and the repositories.

pub mod identity;
pub mod services;

pub use identity::{AuthResult, AuthService};
pub use services::CrudService;
