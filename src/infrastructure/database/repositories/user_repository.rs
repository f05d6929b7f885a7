use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::db_err;
use crate::domain::{DomainError, DomainResult, User, UserRepositoryInterface};
use crate::infrastructure::database::entities::user;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_one(&self, column: user::Column, value: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(column.eq(value))
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        Ok(model.map(user_model_to_domain))
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        is_active: model.is_active,
        last_login_at: model.last_login_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> DomainResult<User> {
        let now = Utc::now();

        let new_user = user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            is_active: Set(true),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let model = new_user.insert(&self.db).await.map_err(db_err("User"))?;
        Ok(user_model_to_domain(model))
    }

    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>> {
        match self.find_by_username(login).await? {
            Some(user) => Ok(Some(user)),
            None => self.find_by_email(login).await,
        }
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        self.find_one(user::Column::Username, username).await
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        self.find_one(user::Column::Email, email).await
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        Ok(model.map(user_model_to_domain))
    }

    async fn touch_last_login(&self, id: i32) -> DomainResult<()> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::LastLoginAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_support::migrated_db;

    #[tokio::test]
    async fn login_matches_username_or_email() {
        let repo = UserRepository::new(migrated_db().await);
        let created = repo
            .create_user("traveler", "traveler@teyvat.io", "hash")
            .await
            .unwrap();

        let by_name = repo.find_by_login("traveler").await.unwrap().unwrap();
        let by_mail = repo
            .find_by_login("traveler@teyvat.io")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_mail.id, created.id);
        assert!(repo.find_by_login("paimon").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let repo = UserRepository::new(migrated_db().await);
        repo.create_user("lumine", "a@teyvat.io", "hash")
            .await
            .unwrap();

        let err = repo
            .create_user("lumine", "b@teyvat.io", "hash")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn touch_last_login_sets_timestamp() {
        let repo = UserRepository::new(migrated_db().await);
        let created = repo
            .create_user("aether", "aether@teyvat.io", "hash")
            .await
            .unwrap();
        assert!(created.last_login_at.is_none());

        repo.touch_last_login(created.id).await.unwrap();

        let user = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert!(user.last_login_at.is_some());
        assert!(matches!(
            repo.touch_last_login(9999).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
