use sea_orm_migration::prelude::*;

use super::{Properties, Users};

#[derive(DeriveIden)]
enum Favorites {
    Table,
    Id,
    UserId,
    PropertyId,
    CreatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250601_000008_create_favorites_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Favorites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Favorites::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Favorites::UserId).string().not_null())
                    .col(ColumnDef::new(Favorites::PropertyId).string().not_null())
                    .col(ColumnDef::new(Favorites::CreatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorites_user_id")
                            .from(Favorites::Table, Favorites::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorites_property_id")
                            .from(Favorites::Table, Favorites::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One favorite per (user, property)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_favorites_user_property")
                    .table(Favorites::Table)
                    .col(Favorites::UserId)
                    .col(Favorites::PropertyId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Favorites::Table).to_owned())
            .await
    }
}
