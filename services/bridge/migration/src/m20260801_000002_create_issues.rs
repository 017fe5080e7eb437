use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Issues::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Issues::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Issues::Title)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Issues::Description).text())
                    .col(ColumnDef::new(Issues::Status).string().not_null())
                    .col(
                        ColumnDef::new(Issues::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Issues::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Issues::DueDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Issues::Priority).string().not_null())
                    .col(ColumnDef::new(Issues::BusinessKey).string())
                    .col(ColumnDef::new(Issues::SyncStatus).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Issues::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Issues {
    Table,
    Id,
    Title,
    Description,
    Status,
    CreatedAt,
    UpdatedAt,
    DueDate,
    Priority,
    BusinessKey,
    SyncStatus,
}
