use sea_orm_migration::prelude::*;

use super::Properties;

#[derive(DeriveIden)]
enum PropertyPricing {
    Table,
    Id,
    PropertyId,
    PricingType,
    BasePrice,
    Currency,
    PricePer,
    Negotiable,
    PriceHistory,
    SpecialOffers,
    CreatedAt,
    UpdatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250601_000006_create_property_pricing_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PropertyPricing::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PropertyPricing::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PropertyPricing::PropertyId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PropertyPricing::PricingType)
                            .string()
                            .not_null()
                            .check(Expr::col(PropertyPricing::PricingType).is_in([
                                "sale", "rent", "lease", "auction",
                            ])),
                    )
                    .col(ColumnDef::new(PropertyPricing::BasePrice).double().not_null())
                    .col(
                        ColumnDef::new(PropertyPricing::Currency)
                            .string()
                            .not_null()
                            .default("USD"),
                    )
                    .col(ColumnDef::new(PropertyPricing::PricePer).string())
                    .col(
                        ColumnDef::new(PropertyPricing::Negotiable)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(PropertyPricing::PriceHistory)
                            .string()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(PropertyPricing::SpecialOffers)
                            .string()
                            .not_null()
                            .default("{}"),
                    )
                    .col(ColumnDef::new(PropertyPricing::CreatedAt).string().not_null())
                    .col(ColumnDef::new(PropertyPricing::UpdatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_pricing_property_id")
                            .from(PropertyPricing::Table, PropertyPricing::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PropertyPricing::Table).to_owned())
            .await
    }
}
