use async_trait::async_trait;

use super::User;
use crate::domain::DomainResult;

/// Lookups the identity service needs beyond plain CRUD
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> DomainResult<User>;

    /// Match on username first, then email
    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;

    async fn touch_last_login(&self, id: i32) -> DomainResult<()>;
}
