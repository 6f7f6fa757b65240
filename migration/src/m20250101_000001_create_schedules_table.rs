use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Schedule::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Schedule::Id)
                        .uuid()
                        .not_null()
                        .primary_key()
                        .extra("DEFAULT gen_random_uuid()".to_string())
                )
                .col(ColumnDef::new(Schedule::Kind).string_len(20).not_null())
                .col(ColumnDef::new(Schedule::OwnerId).big_integer().not_null())
                .col(ColumnDef::new(Schedule::Target).string().not_null())
                .col(ColumnDef::new(Schedule::Text).text().not_null())
                .col(ColumnDef::new(Schedule::MediaKind).string_len(10).null())
                .col(ColumnDef::new(Schedule::MediaRef).string().null())
                .col(ColumnDef::new(Schedule::Buttons).json_binary().not_null())
                .col(ColumnDef::new(Schedule::PinAfterSend).boolean().not_null())
                .col(ColumnDef::new(Schedule::FireAt).timestamp().null())
                .col(ColumnDef::new(Schedule::StartAt).timestamp().null())
                .col(ColumnDef::new(Schedule::Interval).string_len(20).null())
                .col(ColumnDef::new(Schedule::RepetitionsRemaining).integer().null())
                .col(
                    ColumnDef::new(Schedule::CreatedAt)
                        .timestamp()
                        .not_null()
                        .extra("DEFAULT NOW()".to_string())
                )
                .to_owned()
        ).await?;

        // Create indexes
        manager.create_index(
            Index::create()
                .name("idx_schedules_owner_id")
                .table(Schedule::Table)
                .col(Schedule::OwnerId)
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .name("idx_schedules_created_at")
                .table(Schedule::Table)
                .col(Schedule::CreatedAt)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Schedule::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Schedule {
    Table,
    Id,
    Kind,
    OwnerId,
    Target,
    Text,
    MediaKind,
    MediaRef,
    Buttons,
    PinAfterSend,
    FireAt,
    StartAt,
    Interval,
    RepetitionsRemaining,
    CreatedAt,
}
