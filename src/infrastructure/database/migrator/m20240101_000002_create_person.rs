//! Create person table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Person::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Person::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Person::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Person::Age).integer().not_null().default(0))
                    .col(ColumnDef::new(Person::Gender).string_len(10).not_null().default(""))
                    .col(ColumnDef::new(Person::Email).string_len(100).null().unique_key())
                    .col(ColumnDef::new(Person::Phone).string_len(20).not_null().default(""))
                    .col(ColumnDef::new(Person::Address).string_len(255).not_null().default(""))
                    .col(ColumnDef::new(Person::Company).string_len(100).not_null().default(""))
                    .col(ColumnDef::new(Person::Position).string_len(50).not_null().default(""))
                    .col(ColumnDef::new(Person::Status).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(Person::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Person::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Person::DeletedAt).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_person_deleted_at")
                    .table(Person::Table)
                    .col(Person::DeletedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Person::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Person {
    Table,
    Id,
    Name,
    Age,
    Gender,
    Email,
    Phone,
    Address,
    Company,
    Position,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
