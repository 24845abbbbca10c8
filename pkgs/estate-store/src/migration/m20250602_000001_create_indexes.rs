use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250602_000001_create_indexes"
    }
}

const INDEXES: &[(&str, &str, &str)] = &[
    ("idx_properties_agent_id", "properties", "agent_id"),
    ("idx_properties_type", "properties", "type"),
    ("idx_properties_location", "properties", "location"),
    ("idx_property_media_property_id", "property_media", "property_id"),
    ("idx_featured_properties_feature_type", "featured_properties", "feature_type"),
    ("idx_property_pricing_property_id", "property_pricing", "property_id"),
    ("idx_owner_reviews_owner_id", "owner_reviews", "owner_id"),
    ("idx_favorites_user_id", "favorites", "user_id"),
    ("idx_messages_sender_id", "messages", "sender_id"),
    ("idx_messages_receiver_id", "messages", "receiver_id"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, column) in INDEXES {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(*name)
                        .table(Alias::new(*table))
                        .col(Alias::new(*column))
                        .to_owned(),
                )
                .await?;
        }

        // At most one primary media item per property. Partial indexes are
        // not expressible through the index builder.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_property_media_primary \
                 ON property_media(property_id) WHERE is_primary = 1",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS idx_property_media_primary")
            .await?;

        for (name, table, _) in INDEXES {
            manager
                .drop_index(
                    Index::drop()
                        .name(*name)
                        .table(Alias::new(*table))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}
