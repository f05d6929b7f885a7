use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, IntoActiveModel, QueryFilter, Select,
};
use serde::Serialize;

use super::db_err;
use crate::domain::{CrudRepository, DomainError, DomainResult, ListQuery};
use crate::infrastructure::database::query::fetch_page;
use crate::infrastructure::database::resource::Resource;
use crate::shared::PageRequest;

/// CRUD over any [`Resource`] entity
pub struct SeaOrmRepository<E> {
    db: DatabaseConnection,
    _entity: PhantomData<fn() -> E>,
}

impl<E> SeaOrmRepository<E> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

impl<E: Resource> SeaOrmRepository<E> {
    /// Select over live rows only
    fn live() -> Select<E> {
        match E::SOFT_DELETE {
            Some(deleted_at) => E::find().filter(deleted_at.is_null()),
            None => E::find(),
        }
    }

    async fn find_live(&self, id: i32) -> DomainResult<E::Model> {
        Self::live()
            .filter(E::ID.eq(id))
            .one(&self.db)
            .await
            .map_err(DomainError::Storage)?
            .ok_or_else(|| DomainError::not_found(E::LABEL, id))
    }
}

#[async_trait]
impl<E> CrudRepository for SeaOrmRepository<E>
where
    E: Resource,
    E::Model: Serialize + IntoActiveModel<E::ActiveModel> + Send + Sync + 'static,
    E::ActiveModel: Send + Sync,
{
    type Record = E::Model;
    type Create = E::Create;
    type Update = E::Update;

    fn label(&self) -> &'static str {
        E::LABEL
    }

    fn record_id(record: &E::Model) -> i32 {
        E::id_of(record)
    }

    async fn create(&self, input: E::Create) -> DomainResult<E::Model> {
        let model = E::build(input, Utc::now())?;
        model.insert(&self.db).await.map_err(db_err(E::LABEL))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<E::Model> {
        self.find_live(id).await
    }

    async fn list(&self, page: &PageRequest) -> DomainResult<(Vec<E::Model>, u64)> {
        let query = ListQuery::resolve(page, E::SORTABLE, E::SEARCHABLE)?;
        let result = fetch_page(&self.db, Self::live(), &query, E::DEFAULT_ORDER, E::ID).await?;
        Ok(result)
    }

    async fn update(&self, id: i32, input: E::Update) -> DomainResult<E::Model> {
        let existing = self.find_live(id).await?;
        let mut model = existing.into_active_model();
        E::apply(&mut model, input, Utc::now())?;
        model.update(&self.db).await.map_err(db_err(E::LABEL))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = match E::SOFT_DELETE {
            Some(deleted_at) => {
                E::update_many()
                    .col_expr(deleted_at, Expr::value(Utc::now()))
                    .filter(E::ID.eq(id))
                    .filter(deleted_at.is_null())
                    .exec(&self.db)
                    .await?
                    .rows_affected
            }
            None => {
                E::delete_many()
                    .filter(E::ID.eq(id))
                    .exec(&self.db)
                    .await?
                    .rows_affected
            }
        };

        if result == 0 {
            return Err(DomainError::not_found(E::LABEL, id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::EntityTrait;

    use crate::domain::catalog::{
        ArtifactType, CreateArtifactDto, CreateArtifactSetDto, CreateNationDto, CreatePersonDto,
        UpdatePersonDto,
    };
    use crate::domain::FieldKind;
    use crate::infrastructure::database::entities::{artifact, artifact_set, nation, person};
    use crate::infrastructure::database::test_support::migrated_db;

    fn new_person(name: &str, status: i32) -> CreatePersonDto {
        CreatePersonDto {
            name: name.to_string(),
            age: 30,
            gender: "f".to_string(),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            phone: String::new(),
            address: String::new(),
            company: "Acme".to_string(),
            position: String::new(),
            status,
        }
    }

    async fn seeded_people(count: usize) -> SeaOrmRepository<person::Entity> {
        let repo = SeaOrmRepository::<person::Entity>::new(migrated_db().await);
        for i in 0..count {
            repo.create(new_person(&format!("Person{:02}", i), (i % 2) as i32))
                .await
                .unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn second_page_of_twenty_five() {
        let repo = seeded_people(25).await;

        let (rows, total) = repo.list(&PageRequest::new(2, 10)).await.unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(total, 25);
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let repo = seeded_people(3).await;

        let (rows, total) = repo.list(&PageRequest::new(i64::MAX, 100)).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, 3);

        let (rows, _) = repo
            .list(&PageRequest::new(100_000_000_000_000_000, 100))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn short_table_fits_one_page() {
        let repo = seeded_people(3).await;

        let (rows, total) = repo.list(&PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn pages_do_not_overlap() {
        let repo = seeded_people(25).await;

        let mut seen = Vec::new();
        for page in 1..=3 {
            let (rows, _) = repo.list(&PageRequest::new(page, 10)).await.unwrap();
            seen.extend(rows.into_iter().map(|p| p.id));
        }
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 25);
    }

    #[tokio::test]
    async fn total_does_not_depend_on_paging() {
        let repo = seeded_people(12).await;

        let (_, a) = repo.list(&PageRequest::new(1, 5)).await.unwrap();
        let (_, b) = repo.list(&PageRequest::new(3, 5)).await.unwrap();
        let (_, c) = repo.list(&PageRequest::new(1, 100)).await.unwrap();
        assert_eq!((a, b, c), (12, 12, 12));
    }

    #[tokio::test]
    async fn sorted_results_are_monotonic() {
        let repo = seeded_people(8).await;

        let (rows, _) = repo
            .list(&PageRequest::new(1, 100).with_sort("name", "asc"))
            .await
            .unwrap();
        assert!(rows.windows(2).all(|w| w[0].name <= w[1].name));

        let (rows, _) = repo
            .list(&PageRequest::new(1, 100).with_sort("Name", "desc"))
            .await
            .unwrap();
        assert!(rows.windows(2).all(|w| w[0].name >= w[1].name));

        let (rows, _) = repo
            .list(&PageRequest::new(1, 100).with_sort("status", "asc"))
            .await
            .unwrap();
        assert!(rows.windows(2).all(|w| w[0].status <= w[1].status));
    }

    #[tokio::test]
    async fn disallowed_sort_field_is_rejected() {
        let repo = seeded_people(2).await;

        let err = repo
            .list(&PageRequest::new(1, 10).with_sort("age; DROP TABLE person", "asc"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidField {
                kind: FieldKind::Sort,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn keyword_search_on_one_field_or_all() {
        let repo = seeded_people(0).await;
        repo.create(new_person("Alice", 1)).await.unwrap();
        repo.create(new_person("Bob", 1)).await.unwrap();
        let mut carol = new_person("Carol", 1);
        carol.email = Some("alice.fan@example.com".to_string());
        repo.create(carol).await.unwrap();

        let (rows, total) = repo
            .list(&PageRequest::new(1, 10).with_search("Alice", Some("name")))
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].name, "Alice");

        // name OR email
        let (_, total) = repo
            .list(&PageRequest::new(1, 10).with_search("alice", None))
            .await
            .unwrap();
        assert_eq!(total, 2);

        let err = repo
            .list(&PageRequest::new(1, 10).with_search("alice", Some("company")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidField {
                kind: FieldKind::Search,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn default_order_is_newest_first() {
        let repo = seeded_people(3).await;

        let (rows, _) = repo.list(&PageRequest::default()).await.unwrap();
        assert!(rows
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let repo = seeded_people(1).await;
        let (rows, _) = repo.list(&PageRequest::default()).await.unwrap();
        let before = rows[0].clone();

        let after = repo
            .update(
                before.id,
                UpdatePersonDto {
                    status: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(after.status, 0);
        assert_eq!(after.name, before.name);
        assert_eq!(after.email, before.email);
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn soft_deleted_rows_disappear() {
        let repo = seeded_people(2).await;
        let (rows, _) = repo.list(&PageRequest::default()).await.unwrap();
        let id = rows[0].id;

        repo.delete(id).await.unwrap();

        assert!(matches!(
            repo.find_by_id(id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            repo.delete(id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            repo.update(id, UpdatePersonDto::default()).await,
            Err(DomainError::NotFound { .. })
        ));
        let (_, total) = repo.list(&PageRequest::default()).await.unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn duplicate_unique_column_is_a_conflict() {
        let repo = seeded_people(0).await;
        repo.create(new_person("Dup", 1)).await.unwrap();

        let err = repo.create(new_person("Dup", 1)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn nation_is_hard_deleted() {
        let repo = SeaOrmRepository::<nation::Entity>::new(migrated_db().await);
        let created = repo
            .create(CreateNationDto {
                name: "Mondstadt".to_string(),
            })
            .await
            .unwrap();

        repo.delete(created.id).await.unwrap();

        assert!(nation::Entity::find_by_id(created.id)
            .one(&repo.db)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn artifact_belongs_to_a_set() {
        let db = migrated_db().await;
        let sets = SeaOrmRepository::<artifact_set::Entity>::new(db.clone());
        let artifacts = SeaOrmRepository::<artifact::Entity>::new(db);

        let set = sets
            .create(CreateArtifactSetDto {
                name: "Gladiator's Finale".to_string(),
            })
            .await
            .unwrap();
        let created = artifacts
            .create(CreateArtifactDto {
                artifact_set_id: set.id,
                name: "Gladiator's Nostalgia".to_string(),
                kind: ArtifactType::Flower,
                description: String::new(),
                story: String::new(),
            })
            .await
            .unwrap();

        let found = artifacts.find_by_id(created.id).await.unwrap();
        assert_eq!(found.artifact_set_id, set.id);
        assert_eq!(found.kind, artifact::ArtifactType::Flower);
        assert_eq!(
            serde_json::to_value(&found).unwrap()["type"],
            serde_json::json!("flower")
        );
    }
}
