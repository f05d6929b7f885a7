//! Generic CRUD repository port
//!
//! Every catalog resource (and the user admin API) goes through this one
//! trait; persistence adapters implement it once per storage backend.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use crate::domain::DomainResult;
use crate::shared::PageRequest;

#[async_trait]
pub trait CrudRepository: Send + Sync + 'static {
    /// Stored record as returned to clients
    type Record: Serialize + Send + Sync + 'static;
    /// Payload accepted by `create`
    type Create: DeserializeOwned + Validate + Send + 'static;
    /// Partial payload accepted by `update`; absent fields stay unchanged
    type Update: DeserializeOwned + Validate + Send + 'static;

    /// Human readable resource name used in errors and logs
    fn label(&self) -> &'static str;

    fn record_id(record: &Self::Record) -> i32;

    async fn create(&self, input: Self::Create) -> DomainResult<Self::Record>;

    /// Fails with `NotFound` for missing or soft-deleted rows
    async fn find_by_id(&self, id: i32) -> DomainResult<Self::Record>;

    /// One page of records plus the total number of matches
    async fn list(&self, page: &PageRequest) -> DomainResult<(Vec<Self::Record>, u64)>;

    async fn update(&self, id: i32, input: Self::Update) -> DomainResult<Self::Record>;

    async fn delete(&self, id: i32) -> DomainResult<()>;
}
