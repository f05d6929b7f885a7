//! Generic CRUD service
//!
//! Thin orchestration over a [`CrudRepository`]: builds page responses and
//! logs every outcome with the entity name, id and paging context.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::{CrudRepository, DomainError, DomainResult};
use crate::shared::{PageRequest, PageResponse};

pub struct CrudService<R> {
    repo: Arc<R>,
}

impl<R> Clone for CrudService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R: CrudRepository> CrudService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }

    pub fn label(&self) -> &'static str {
        self.repo.label()
    }

    pub async fn create(&self, input: R::Create) -> DomainResult<R::Record> {
        let record = self
            .repo
            .create(input)
            .await
            .map_err(|e| self.failed("create", None, e))?;

        info!(entity = self.label(), id = R::record_id(&record), "Record created");
        Ok(record)
    }

    pub async fn get(&self, id: i32) -> DomainResult<R::Record> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| self.failed("get", Some(id), e))
    }

    pub async fn list(&self, page: &PageRequest) -> DomainResult<PageResponse<R::Record>> {
        let (data, total) = self.repo.list(page).await.map_err(|e| {
            warn_or_error(&e, || {
                format!(
                    "list {} failed (page={}, page_size={}, sort_by={:?}, search_by={:?})",
                    self.label(),
                    page.page(),
                    page.page_size(),
                    page.sort_by(),
                    page.search_by()
                )
            });
            e
        })?;

        info!(
            entity = self.label(),
            page = page.page(),
            page_size = page.page_size(),
            returned = data.len(),
            total,
            "Records listed"
        );
        Ok(PageResponse::new(data, total, page.page(), page.page_size()))
    }

    pub async fn update(&self, id: i32, input: R::Update) -> DomainResult<R::Record> {
        let record = self
            .repo
            .update(id, input)
            .await
            .map_err(|e| self.failed("update", Some(id), e))?;

        info!(entity = self.label(), id, "Record updated");
        Ok(record)
    }

    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        self.repo
            .delete(id)
            .await
            .map_err(|e| self.failed("delete", Some(id), e))?;

        info!(entity = self.label(), id, "Record deleted");
        Ok(())
    }

    fn failed(&self, op: &str, id: Option<i32>, e: DomainError) -> DomainError {
        warn_or_error(&e, || format!("{} {} failed (id={:?})", op, self.label(), id));
        e
    }
}

/// Caller mistakes are warnings; storage failures are errors.
fn warn_or_error(e: &DomainError, context: impl FnOnce() -> String) {
    if e.is_client_error() {
        warn!(error = %e, "{}", context());
    } else {
        error!(error = %e, "{}", context());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::CreateVersionDto;
    use crate::infrastructure::database::entities::version;
    use crate::infrastructure::database::repositories::SeaOrmRepository;
    use crate::infrastructure::database::test_support::migrated_db;

    async fn service_with(count: usize) -> CrudService<SeaOrmRepository<version::Entity>> {
        let service = CrudService::new(SeaOrmRepository::new(migrated_db().await));
        for i in 0..count {
            service
                .create(CreateVersionDto {
                    name: format!("{}.{}", i / 10 + 1, i % 10),
                })
                .await
                .unwrap();
        }
        service
    }

    #[tokio::test]
    async fn page_two_of_twenty_five() {
        let service = service_with(25).await;

        let page = service.list(&PageRequest::new(2, 10)).await.unwrap();
        assert_eq!(page.data.len(), 10);
        assert_eq!(page.total, 25);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
    }

    #[tokio::test]
    async fn three_rows_one_page() {
        let service = service_with(3).await;

        let page = service.list(&PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(page.data.len(), 3);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn oversized_page_is_clamped() {
        let service = service_with(3).await;

        let page = service.list(&PageRequest::new(0, 1000)).await.unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 100);
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let service = service_with(0).await;

        assert!(matches!(
            service.get(404).await,
            Err(DomainError::NotFound { entity: "Version", .. })
        ));
    }
}
