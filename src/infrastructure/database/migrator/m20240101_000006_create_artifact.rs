//! Create artifact table

use sea_orm_migration::prelude::*;

use super::m20240101_000005_create_artifact_set::ArtifactSet;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Artifact::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Artifact::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Artifact::ArtifactSetId).integer().not_null())
                    .col(ColumnDef::new(Artifact::Name).string_len(100).not_null())
                    // flower, plume, sands, goblet, circlet
                    .col(ColumnDef::new(Artifact::Type).string_len(20).not_null())
                    .col(ColumnDef::new(Artifact::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Artifact::Story).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Artifact::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Artifact::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Artifact::DeletedAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artifact_artifact_set")
                            .from(Artifact::Table, Artifact::ArtifactSetId)
                            .to(ArtifactSet::Table, ArtifactSet::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_artifact_artifact_set_id")
                    .table(Artifact::Table)
                    .col(Artifact::ArtifactSetId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Artifact::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Artifact {
    Table,
    Id,
    ArtifactSetId,
    Name,
    Type,
    Description,
    Story,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
