use sea_orm_migration::prelude::*;

use super::Users;

#[derive(DeriveIden)]
enum OwnerProfiles {
    Table,
    Id,
    UserId,
    BusinessName,
    BusinessDescription,
    BusinessLogo,
    CoverImage,
    IntroVideo,
    WebsiteUrl,
    SocialMedia,
    BusinessHours,
    ServiceAreas,
    Specialties,
    YearsExperience,
    TotalProperties,
    Rating,
    ReviewCount,
    IsVerified,
    SubscriptionTier,
    CreatedAt,
    UpdatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250601_000002_create_owner_profiles_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OwnerProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OwnerProfiles::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OwnerProfiles::UserId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(OwnerProfiles::BusinessName).string())
                    .col(ColumnDef::new(OwnerProfiles::BusinessDescription).string())
                    .col(ColumnDef::new(OwnerProfiles::BusinessLogo).string())
                    .col(ColumnDef::new(OwnerProfiles::CoverImage).string())
                    .col(ColumnDef::new(OwnerProfiles::IntroVideo).string())
                    .col(ColumnDef::new(OwnerProfiles::WebsiteUrl).string())
                    .col(
                        ColumnDef::new(OwnerProfiles::SocialMedia)
                            .string()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(OwnerProfiles::BusinessHours)
                            .string()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(OwnerProfiles::ServiceAreas)
                            .string()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(OwnerProfiles::Specialties)
                            .string()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(OwnerProfiles::YearsExperience)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OwnerProfiles::TotalProperties)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OwnerProfiles::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(OwnerProfiles::ReviewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OwnerProfiles::IsVerified)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OwnerProfiles::SubscriptionTier)
                            .string()
                            .not_null()
                            .default("basic")
                            .check(Expr::col(OwnerProfiles::SubscriptionTier).is_in([
                                "basic",
                                "premium",
                                "professional",
                            ])),
                    )
                    .col(ColumnDef::new(OwnerProfiles::CreatedAt).string().not_null())
                    .col(ColumnDef::new(OwnerProfiles::UpdatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_owner_profiles_user_id")
                            .from(OwnerProfiles::Table, OwnerProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OwnerProfiles::Table).to_owned())
            .await
    }
}
