//! Artifact entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::catalog;

/// Artifact slot as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    #[sea_orm(string_value = "flower")]
    Flower,
    #[sea_orm(string_value = "plume")]
    Plume,
    #[sea_orm(string_value = "sands")]
    Sands,
    #[sea_orm(string_value = "goblet")]
    Goblet,
    #[sea_orm(string_value = "circlet")]
    Circlet,
}

impl From<catalog::ArtifactType> for ArtifactType {
    fn from(kind: catalog::ArtifactType) -> Self {
        match kind {
            catalog::ArtifactType::Flower => Self::Flower,
            catalog::ArtifactType::Plume => Self::Plume,
            catalog::ArtifactType::Sands => Self::Sands,
            catalog::ArtifactType::Goblet => Self::Goblet,
            catalog::ArtifactType::Circlet => Self::Circlet,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "artifact")]
#[schema(as = Artifact)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub artifact_set_id: i32,
    pub name: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: ArtifactType,
    pub description: String,
    pub story: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::artifact_set::Entity",
        from = "Column::ArtifactSetId",
        to = "super::artifact_set::Column::Id"
    )]
    ArtifactSet,
}

impl Related<super::artifact_set::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArtifactSet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
