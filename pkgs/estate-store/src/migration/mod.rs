//! Sea-ORM migrations for the estate-store database schema
//!
//! Every table and index is created with `IF NOT EXISTS`, and the migrator
//! records applied versions, so running `Migrator::up` against an already
//! initialised database changes nothing.

pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users_table;
mod m20250601_000002_create_owner_profiles_table;
mod m20250601_000003_create_properties_table;
mod m20250601_000004_create_property_media_table;
mod m20250601_000005_create_featured_properties_table;
mod m20250601_000006_create_property_pricing_table;
mod m20250601_000007_create_owner_reviews_table;
mod m20250601_000008_create_favorites_table;
mod m20250601_000009_create_messages_table;
mod m20250602_000001_create_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users_table::Migration),
            Box::new(m20250601_000002_create_owner_profiles_table::Migration),
            Box::new(m20250601_000003_create_properties_table::Migration),
            Box::new(m20250601_000004_create_property_media_table::Migration),
            Box::new(m20250601_000005_create_featured_properties_table::Migration),
            Box::new(m20250601_000006_create_property_pricing_table::Migration),
            Box::new(m20250601_000007_create_owner_reviews_table::Migration),
            Box::new(m20250601_000008_create_favorites_table::Migration),
            Box::new(m20250601_000009_create_messages_table::Migration),
            Box::new(m20250602_000001_create_indexes::Migration),
        ]
    }
}

/// Column identifiers shared by the migrations that reference other tables.
#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
pub(crate) enum Properties {
    Table,
    Id,
}
