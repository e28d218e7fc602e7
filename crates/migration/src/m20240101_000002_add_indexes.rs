use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listing is ordered by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_system_role_created_at")
                    .table(SystemRole::Table)
                    .col(SystemRole::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_system_role_is_deleted")
                    .table(SystemRole::Table)
                    .col(SystemRole::IsDeleted)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_system_role_created_at").table(SystemRole::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_system_role_is_deleted").table(SystemRole::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SystemRole { Table, CreatedAt, IsDeleted }
