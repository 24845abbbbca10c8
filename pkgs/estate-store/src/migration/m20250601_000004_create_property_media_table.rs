use sea_orm_migration::prelude::*;

use super::Properties;

#[derive(DeriveIden)]
enum PropertyMedia {
    Table,
    Id,
    PropertyId,
    MediaType,
    MediaUrl,
    ThumbnailUrl,
    Title,
    Description,
    DisplayOrder,
    IsPrimary,
    CreatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250601_000004_create_property_media_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PropertyMedia::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PropertyMedia::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PropertyMedia::PropertyId).string().not_null())
                    .col(
                        ColumnDef::new(PropertyMedia::MediaType)
                            .string()
                            .not_null()
                            .check(Expr::col(PropertyMedia::MediaType).is_in([
                                "image",
                                "video",
                                "virtual_tour",
                            ])),
                    )
                    .col(ColumnDef::new(PropertyMedia::MediaUrl).string().not_null())
                    .col(ColumnDef::new(PropertyMedia::ThumbnailUrl).string())
                    .col(ColumnDef::new(PropertyMedia::Title).string())
                    .col(ColumnDef::new(PropertyMedia::Description).string())
                    .col(
                        ColumnDef::new(PropertyMedia::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PropertyMedia::IsPrimary)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(PropertyMedia::CreatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_media_property_id")
                            .from(PropertyMedia::Table, PropertyMedia::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PropertyMedia::Table).to_owned())
            .await
    }
}
