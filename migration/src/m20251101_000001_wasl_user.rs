use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WaslUser::Table)
                    .if_not_exists()
                    .col(pk_auto(WaslUser::Id))
                    .col(string_len(WaslUser::Name, 100))
                    .col(string_len_uniq(WaslUser::Email, 150))
                    .col(string(WaslUser::PasswordHash))
                    .col(string_len(WaslUser::Role, 20))
                    .col(timestamp(WaslUser::CreatedAt))
                    .col(timestamp(WaslUser::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WaslUser::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum WaslUser {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
    UpdatedAt,
}
