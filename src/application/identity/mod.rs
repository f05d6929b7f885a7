//! Identity module: registration and authentication
//!
//! Contains the `AuthService` which orchestrates sign up, login and profile
//! lookups on top of the user repository.

pub mod service;

pub use service::{AuthResult, AuthService};
