//! Owner profile entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "owner_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub user_id: String,
    pub business_name: Option<String>,
    pub business_description: Option<String>,
    pub business_logo: Option<String>,
    pub cover_image: Option<String>,
    pub intro_video: Option<String>,
    pub website_url: Option<String>,
    pub social_media: String,   // JSON object: platform -> url
    pub business_hours: String, // JSON object: day -> {open, close, isOpen}
    pub service_areas: String,  // JSON array
    pub specialties: String,    // JSON array
    pub years_experience: i32,
    pub total_properties: i32,
    pub rating: f64,
    pub review_count: i32,
    pub is_verified: i32,
    pub subscription_tier: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
