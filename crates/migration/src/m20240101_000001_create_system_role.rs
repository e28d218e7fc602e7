//! Create `system_role` table.
//!
//! Rows are never deleted by the application; `is_deleted` marks inactive roles.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SystemRole::Table)
                    .if_not_exists()
                    .col(uuid(SystemRole::Id).primary_key())
                    .col(string_len(SystemRole::Name, 128).unique_key().not_null())
                    .col(ColumnDef::new(SystemRole::Description).text().null())
                    .col(json_binary(SystemRole::Permissions).not_null())
                    .col(boolean(SystemRole::IsDeleted).not_null().default(false))
                    .col(uuid(SystemRole::CreatedBy).not_null())
                    .col(ColumnDef::new(SystemRole::UpdatedBy).uuid().null())
                    .col(timestamp_with_time_zone(SystemRole::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(SystemRole::UpdatedAt).not_null())
                    .col(integer(SystemRole::Version).not_null().default(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SystemRole::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum SystemRole {
    Table,
    Id,
    Name,
    Description,
    Permissions,
    IsDeleted,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
    Version,
}
