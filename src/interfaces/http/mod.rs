//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping and the validating extractor
//! - `middleware`: Authentication middleware (Bearer JWT or session cookie)
//! - `modules`: Request handlers grouped by resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiContext, ApiDoc};
