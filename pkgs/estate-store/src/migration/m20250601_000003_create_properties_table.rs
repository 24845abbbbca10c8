use sea_orm_migration::prelude::*;

use super::Users;

#[derive(DeriveIden)]
enum Properties {
    Table,
    Id,
    Title,
    Description,
    Price,
    Type,
    Bedrooms,
    Bathrooms,
    Area,
    Location,
    Images,
    Features,
    AgentId,
    IsPremiumListing,
    CreatedAt,
    UpdatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250601_000003_create_properties_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Properties::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Properties::Title).string().not_null())
                    .col(
                        ColumnDef::new(Properties::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Properties::Price).double().not_null())
                    .col(
                        ColumnDef::new(Properties::Type)
                            .string()
                            .not_null()
                            .check(Expr::col(Properties::Type).is_in(["sale", "rent"])),
                    )
                    .col(
                        ColumnDef::new(Properties::Bedrooms)
                            .integer()
                            .not_null()
                            .check(Expr::col(Properties::Bedrooms).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Properties::Bathrooms)
                            .double()
                            .not_null()
                            .check(Expr::col(Properties::Bathrooms).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Properties::Area)
                            .double()
                            .not_null()
                            .check(Expr::col(Properties::Area).gte(0)),
                    )
                    .col(ColumnDef::new(Properties::Location).string().not_null())
                    .col(
                        ColumnDef::new(Properties::Images)
                            .string()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Properties::Features)
                            .string()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Properties::AgentId).string().not_null())
                    .col(
                        ColumnDef::new(Properties::IsPremiumListing)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Properties::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Properties::UpdatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_properties_agent_id")
                            .from(Properties::Table, Properties::AgentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await
    }
}
