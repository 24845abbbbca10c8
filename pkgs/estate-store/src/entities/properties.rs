//! Property entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    #[sea_orm(column_name = "type")]
    pub property_type: String, // "sale" or "rent"
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub area: f64,
    pub location: String,
    pub images: String,   // JSON array, ordered
    pub features: String, // JSON array
    pub agent_id: String,
    pub is_premium_listing: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
