//! Property pricing entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "property_pricing")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub property_id: String,
    pub pricing_type: String,
    pub base_price: f64,
    pub currency: String,
    pub price_per: Option<String>,
    pub negotiable: i32,
    pub price_history: String,  // JSON array of {price, date, reason?}
    pub special_offers: String, // JSON object
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
