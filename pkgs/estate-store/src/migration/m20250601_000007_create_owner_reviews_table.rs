use sea_orm_migration::prelude::*;

use super::{Properties, Users};

#[derive(DeriveIden)]
enum OwnerReviews {
    Table,
    Id,
    OwnerId,
    ReviewerId,
    PropertyId,
    Rating,
    ReviewText,
    ResponseText,
    IsVerified,
    CreatedAt,
    UpdatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250601_000007_create_owner_reviews_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OwnerReviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OwnerReviews::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OwnerReviews::OwnerId).string().not_null())
                    .col(ColumnDef::new(OwnerReviews::ReviewerId).string().not_null())
                    .col(ColumnDef::new(OwnerReviews::PropertyId).string())
                    .col(
                        ColumnDef::new(OwnerReviews::Rating)
                            .integer()
                            .not_null()
                            .check(Expr::col(OwnerReviews::Rating).between(1, 5)),
                    )
                    .col(ColumnDef::new(OwnerReviews::ReviewText).string())
                    .col(ColumnDef::new(OwnerReviews::ResponseText).string())
                    .col(
                        ColumnDef::new(OwnerReviews::IsVerified)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(OwnerReviews::CreatedAt).string().not_null())
                    .col(ColumnDef::new(OwnerReviews::UpdatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_owner_reviews_owner_id")
                            .from(OwnerReviews::Table, OwnerReviews::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_owner_reviews_reviewer_id")
                            .from(OwnerReviews::Table, OwnerReviews::ReviewerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_owner_reviews_property_id")
                            .from(OwnerReviews::Table, OwnerReviews::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OwnerReviews::Table).to_owned())
            .await
    }
}
