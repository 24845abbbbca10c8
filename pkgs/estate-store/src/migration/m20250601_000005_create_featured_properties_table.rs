use sea_orm_migration::prelude::*;

use super::{Properties, Users};

#[derive(DeriveIden)]
enum FeaturedProperties {
    Table,
    Id,
    PropertyId,
    OwnerId,
    FeatureType,
    StartDate,
    EndDate,
    Priority,
    PaymentAmount,
    PaymentStatus,
    CreatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250601_000005_create_featured_properties_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeaturedProperties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeaturedProperties::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FeaturedProperties::PropertyId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeaturedProperties::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(FeaturedProperties::FeatureType)
                            .string()
                            .not_null()
                            .check(Expr::col(FeaturedProperties::FeatureType).is_in([
                                "homepage_hero",
                                "premium_listing",
                                "sponsored",
                            ])),
                    )
                    .col(
                        ColumnDef::new(FeaturedProperties::StartDate)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeaturedProperties::EndDate).string())
                    .col(
                        ColumnDef::new(FeaturedProperties::Priority)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(FeaturedProperties::PaymentAmount).double())
                    .col(
                        ColumnDef::new(FeaturedProperties::PaymentStatus)
                            .string()
                            .not_null()
                            .default("pending")
                            .check(Expr::col(FeaturedProperties::PaymentStatus).is_in([
                                "pending", "paid", "expired",
                            ])),
                    )
                    .col(
                        ColumnDef::new(FeaturedProperties::CreatedAt)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_featured_properties_property_id")
                            .from(FeaturedProperties::Table, FeaturedProperties::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_featured_properties_owner_id")
                            .from(FeaturedProperties::Table, FeaturedProperties::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeaturedProperties::Table).to_owned())
            .await
    }
}
