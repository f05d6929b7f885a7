//! Per-entity wiring for the generic repository
//!
//! A [`Resource`] ties a SeaORM entity to its request payloads and to the
//! closed field maps used for sorting and searching. Everything else about
//! CRUD is shared by [`SeaOrmRepository`](super::repositories::SeaOrmRepository).

use chrono::{DateTime, Utc};
use sea_orm::{EntityTrait, Set};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::entities::{artifact, artifact_set, nation, person, space, user, version};
use crate::domain::catalog::{
    CreateArtifactDto, CreateArtifactSetDto, CreateNationDto, CreatePersonDto, CreateSpaceDto,
    CreateVersionDto, UpdateArtifactDto, UpdateArtifactSetDto, UpdateNationDto, UpdatePersonDto,
    UpdateSpaceDto, UpdateVersionDto,
};
use crate::domain::{CreateUserDto, DomainError, DomainResult, FieldMap, UpdateUserDto};
use crate::infrastructure::crypto::password::hash_password;

pub trait Resource: EntityTrait {
    type Create: DeserializeOwned + Validate + Send + 'static;
    type Update: DeserializeOwned + Validate + Send + 'static;

    const LABEL: &'static str;
    const ID: Self::Column;
    /// Column used when the client asks for no particular order (descending)
    const DEFAULT_ORDER: Self::Column;
    /// `deleted_at` column for soft-deletable entities
    const SOFT_DELETE: Option<Self::Column> = None;
    const SORTABLE: FieldMap<Self::Column>;
    const SEARCHABLE: FieldMap<Self::Column>;

    fn build(input: Self::Create, now: DateTime<Utc>) -> DomainResult<Self::ActiveModel>;

    /// Copy the fields present in `input` onto `model`
    fn apply(
        model: &mut Self::ActiveModel,
        input: Self::Update,
        now: DateTime<Utc>,
    ) -> DomainResult<()>;

    fn id_of(model: &Self::Model) -> i32;
}

/// Assign `$value` to `$model.$field` when the update carries it.
macro_rules! set_if_some {
    ($model:ident, $($field:ident <- $value:expr),+ $(,)?) => {
        $(
            if let Some(value) = $value {
                $model.$field = Set(value);
            }
        )+
    };
}

fn hash(password: &str) -> DomainResult<String> {
    hash_password(password)
        .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))
}

// ── Person ──────────────────────────────────────────────────────

impl Resource for person::Entity {
    type Create = CreatePersonDto;
    type Update = UpdatePersonDto;

    const LABEL: &'static str = "Person";
    const ID: person::Column = person::Column::Id;
    const DEFAULT_ORDER: person::Column = person::Column::CreatedAt;
    const SOFT_DELETE: Option<person::Column> = Some(person::Column::DeletedAt);
    const SORTABLE: FieldMap<person::Column> = &[
        ("id", person::Column::Id),
        ("name", person::Column::Name),
        ("status", person::Column::Status),
        ("created_at", person::Column::CreatedAt),
    ];
    const SEARCHABLE: FieldMap<person::Column> = &[
        ("name", person::Column::Name),
        ("email", person::Column::Email),
    ];

    fn build(input: CreatePersonDto, now: DateTime<Utc>) -> DomainResult<person::ActiveModel> {
        Ok(person::ActiveModel {
            name: Set(input.name),
            age: Set(input.age),
            gender: Set(input.gender),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            company: Set(input.company),
            position: Set(input.position),
            status: Set(input.status),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        })
    }

    fn apply(
        model: &mut person::ActiveModel,
        input: UpdatePersonDto,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        set_if_some!(model,
            name <- input.name,
            age <- input.age,
            gender <- input.gender,
            phone <- input.phone,
            address <- input.address,
            company <- input.company,
            position <- input.position,
            status <- input.status,
        );
        if let Some(email) = input.email {
            model.email = Set(Some(email));
        }
        model.updated_at = Set(now);
        Ok(())
    }

    fn id_of(model: &person::Model) -> i32 {
        model.id
    }
}

// ── Nation ──────────────────────────────────────────────────────

impl Resource for nation::Entity {
    type Create = CreateNationDto;
    type Update = UpdateNationDto;

    const LABEL: &'static str = "Nation";
    const ID: nation::Column = nation::Column::Id;
    const DEFAULT_ORDER: nation::Column = nation::Column::Id;
    const SORTABLE: FieldMap<nation::Column> =
        &[("id", nation::Column::Id), ("name", nation::Column::Name)];
    const SEARCHABLE: FieldMap<nation::Column> = &[("name", nation::Column::Name)];

    fn build(input: CreateNationDto, _now: DateTime<Utc>) -> DomainResult<nation::ActiveModel> {
        Ok(nation::ActiveModel {
            name: Set(input.name),
            ..Default::default()
        })
    }

    fn apply(
        model: &mut nation::ActiveModel,
        input: UpdateNationDto,
        _now: DateTime<Utc>,
    ) -> DomainResult<()> {
        set_if_some!(model, name <- input.name);
        Ok(())
    }

    fn id_of(model: &nation::Model) -> i32 {
        model.id
    }
}

// ── Version ─────────────────────────────────────────────────────

impl Resource for version::Entity {
    type Create = CreateVersionDto;
    type Update = UpdateVersionDto;

    const LABEL: &'static str = "Version";
    const ID: version::Column = version::Column::Id;
    const DEFAULT_ORDER: version::Column = version::Column::CreatedAt;
    const SOFT_DELETE: Option<version::Column> = Some(version::Column::DeletedAt);
    const SORTABLE: FieldMap<version::Column> = &[
        ("id", version::Column::Id),
        ("name", version::Column::Name),
        ("created_at", version::Column::CreatedAt),
    ];
    const SEARCHABLE: FieldMap<version::Column> = &[("name", version::Column::Name)];

    fn build(input: CreateVersionDto, now: DateTime<Utc>) -> DomainResult<version::ActiveModel> {
        Ok(version::ActiveModel {
            name: Set(input.name),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        })
    }

    fn apply(
        model: &mut version::ActiveModel,
        input: UpdateVersionDto,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        set_if_some!(model, name <- input.name);
        model.updated_at = Set(now);
        Ok(())
    }

    fn id_of(model: &version::Model) -> i32 {
        model.id
    }
}

// ── Artifact set ────────────────────────────────────────────────

impl Resource for artifact_set::Entity {
    type Create = CreateArtifactSetDto;
    type Update = UpdateArtifactSetDto;

    const LABEL: &'static str = "ArtifactSet";
    const ID: artifact_set::Column = artifact_set::Column::Id;
    const DEFAULT_ORDER: artifact_set::Column = artifact_set::Column::CreatedAt;
    const SOFT_DELETE: Option<artifact_set::Column> = Some(artifact_set::Column::DeletedAt);
    const SORTABLE: FieldMap<artifact_set::Column> = &[
        ("id", artifact_set::Column::Id),
        ("name", artifact_set::Column::Name),
        ("created_at", artifact_set::Column::CreatedAt),
    ];
    const SEARCHABLE: FieldMap<artifact_set::Column> = &[("name", artifact_set::Column::Name)];

    fn build(
        input: CreateArtifactSetDto,
        now: DateTime<Utc>,
    ) -> DomainResult<artifact_set::ActiveModel> {
        Ok(artifact_set::ActiveModel {
            name: Set(input.name),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        })
    }

    fn apply(
        model: &mut artifact_set::ActiveModel,
        input: UpdateArtifactSetDto,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        set_if_some!(model, name <- input.name);
        model.updated_at = Set(now);
        Ok(())
    }

    fn id_of(model: &artifact_set::Model) -> i32 {
        model.id
    }
}

// ── Artifact ────────────────────────────────────────────────────

impl Resource for artifact::Entity {
    type Create = CreateArtifactDto;
    type Update = UpdateArtifactDto;

    const LABEL: &'static str = "Artifact";
    const ID: artifact::Column = artifact::Column::Id;
    const DEFAULT_ORDER: artifact::Column = artifact::Column::CreatedAt;
    const SOFT_DELETE: Option<artifact::Column> = Some(artifact::Column::DeletedAt);
    const SORTABLE: FieldMap<artifact::Column> = &[
        ("id", artifact::Column::Id),
        ("name", artifact::Column::Name),
        ("artifact_set_id", artifact::Column::ArtifactSetId),
        ("created_at", artifact::Column::CreatedAt),
    ];
    const SEARCHABLE: FieldMap<artifact::Column> = &[
        ("name", artifact::Column::Name),
        ("description", artifact::Column::Description),
    ];

    fn build(input: CreateArtifactDto, now: DateTime<Utc>) -> DomainResult<artifact::ActiveModel> {
        Ok(artifact::ActiveModel {
            artifact_set_id: Set(input.artifact_set_id),
            name: Set(input.name),
            kind: Set(input.kind.into()),
            description: Set(input.description),
            story: Set(input.story),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        })
    }

    fn apply(
        model: &mut artifact::ActiveModel,
        input: UpdateArtifactDto,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        set_if_some!(model,
            artifact_set_id <- input.artifact_set_id,
            name <- input.name,
            kind <- input.kind.map(Into::into),
            description <- input.description,
            story <- input.story,
        );
        model.updated_at = Set(now);
        Ok(())
    }

    fn id_of(model: &artifact::Model) -> i32 {
        model.id
    }
}

// ── Space ───────────────────────────────────────────────────────

impl Resource for space::Entity {
    type Create = CreateSpaceDto;
    type Update = UpdateSpaceDto;

    const LABEL: &'static str = "Space";
    const ID: space::Column = space::Column::Id;
    const DEFAULT_ORDER: space::Column = space::Column::CreatedAt;
    const SOFT_DELETE: Option<space::Column> = Some(space::Column::DeletedAt);
    const SORTABLE: FieldMap<space::Column> = &[
        ("id", space::Column::Id),
        ("name", space::Column::Name),
        ("created_at", space::Column::CreatedAt),
        ("updated_at", space::Column::UpdatedAt),
    ];
    const SEARCHABLE: FieldMap<space::Column> = &[
        ("name", space::Column::Name),
        ("description", space::Column::Description),
    ];

    fn build(input: CreateSpaceDto, now: DateTime<Utc>) -> DomainResult<space::ActiveModel> {
        Ok(space::ActiveModel {
            name: Set(input.name),
            owner_user_id: Set(input.owner_user_id),
            kind: Set(input.kind),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        })
    }

    fn apply(
        model: &mut space::ActiveModel,
        input: UpdateSpaceDto,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        set_if_some!(model,
            name <- input.name,
            owner_user_id <- input.owner_user_id,
            kind <- input.kind,
            description <- input.description,
        );
        model.updated_at = Set(now);
        Ok(())
    }

    fn id_of(model: &space::Model) -> i32 {
        model.id
    }
}

// ── User ────────────────────────────────────────────────────────

impl Resource for user::Entity {
    type Create = CreateUserDto;
    type Update = UpdateUserDto;

    const LABEL: &'static str = "User";
    const ID: user::Column = user::Column::Id;
    const DEFAULT_ORDER: user::Column = user::Column::CreatedAt;
    const SOFT_DELETE: Option<user::Column> = Some(user::Column::DeletedAt);
    const SORTABLE: FieldMap<user::Column> = &[
        ("id", user::Column::Id),
        ("username", user::Column::Username),
        ("email", user::Column::Email),
        ("created_at", user::Column::CreatedAt),
    ];
    const SEARCHABLE: FieldMap<user::Column> = &[
        ("username", user::Column::Username),
        ("email", user::Column::Email),
    ];

    fn build(input: CreateUserDto, now: DateTime<Utc>) -> DomainResult<user::ActiveModel> {
        Ok(user::ActiveModel {
            username: Set(input.username),
            email: Set(input.email),
            password_hash: Set(hash(&input.password)?),
            is_active: Set(input.is_active),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        })
    }

    fn apply(
        model: &mut user::ActiveModel,
        input: UpdateUserDto,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        set_if_some!(model,
            username <- input.username,
            email <- input.email,
            is_active <- input.is_active,
        );
        if let Some(password) = input.password {
            model.password_hash = Set(hash(&password)?);
        }
        model.updated_at = Set(now);
        Ok(())
    }

    fn id_of(model: &user::Model) -> i32 {
        model.id
    }
}
