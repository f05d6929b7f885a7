//! Create space table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Space::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Space::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Space::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Space::OwnerUserId).integer().not_null())
                    .col(ColumnDef::new(Space::Type).string_len(50).not_null())
                    .col(ColumnDef::new(Space::Description).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Space::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Space::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Space::DeletedAt).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_space_owner_user_id")
                    .table(Space::Table)
                    .col(Space::OwnerUserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Space::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Space {
    Table,
    Id,
    Name,
    OwnerUserId,
    Type,
    Description,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
