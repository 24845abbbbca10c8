//! Pricing terms and price history for a property

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entities::property_pricing;
use crate::enums::PricingType;
use crate::error::Result;
use crate::ids::generate_id;
use crate::marshal::{self, encode_json, marshal_all, non_negative, Marshal};
use crate::repository::{newest_first, Repository};

/// One entry of a property's price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChange {
    pub price: f64,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialOffer {
    /// Percentage off the base price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPricing {
    pub id: String,
    pub property_id: String,
    pub pricing_type: PricingType,
    pub base_price: f64,
    pub currency: String,
    /// Billing period such as "month", for rentals and leases
    pub price_per: Option<String>,
    pub negotiable: bool,
    /// Oldest first
    pub price_history: Vec<PriceChange>,
    pub special_offers: SpecialOffer,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPropertyPricing {
    pub property_id: String,
    pub pricing_type: PricingType,
    pub base_price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub price_per: Option<String>,
    #[serde(default)]
    pub negotiable: bool,
    #[serde(default)]
    pub special_offers: SpecialOffer,
}

pub fn default_currency() -> String {
    "USD".to_string()
}

/// Terms that can be edited directly. The base price and its history only
/// move through [`PricingStore::record_price_change`].
///
/// On nullable columns `Some(None)` writes NULL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPatch {
    pub pricing_type: Option<PricingType>,
    pub currency: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub price_per: Option<Option<String>>,
    pub negotiable: Option<bool>,
    pub special_offers: Option<SpecialOffer>,
}

#[derive(Debug, Clone, Default)]
pub struct PricingFilter {
    pub property_id: Option<String>,
    pub pricing_type: Option<PricingType>,
}

/// Store for the `property_pricing` table
#[derive(Clone)]
pub struct PricingStore {
    db: DatabaseConnection,
}

impl PricingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Most recent pricing record of a property
    pub async fn get_for_property(&self, property_id: &str) -> Result<Option<PropertyPricing>> {
        let rows = self
            .list(&PricingFilter {
                property_id: Some(property_id.to_string()),
                ..Default::default()
            })
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Change the base price, appending the new price to the history.
    pub async fn record_price_change(
        &self,
        id: &str,
        price: f64,
        reason: Option<String>,
    ) -> Result<Option<PropertyPricing>> {
        let price = non_negative("base_price", price)?;
        let Some(model) = property_pricing::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let now = marshal::now();
        let mut history = PropertyPricing::marshal_in(model.clone())?.price_history;
        history.push(PriceChange {
            price,
            date: now,
            reason,
        });

        let mut active: property_pricing::ActiveModel = model.into();
        active.base_price = Set(price);
        active.price_history = Set(encode_json(&history)?);
        active.updated_at = Set(marshal::encode_timestamp(&now));

        let model = active.update(&self.db).await?;
        info!("Price of {} changed to {}", model.property_id, price);
        PropertyPricing::marshal_in(model).map(Some)
    }
}

#[async_trait]
impl Repository for PricingStore {
    type Record = PropertyPricing;
    type Draft = NewPropertyPricing;
    type Patch = PricingPatch;
    type Filter = PricingFilter;

    async fn list(&self, filter: &PricingFilter) -> Result<Vec<PropertyPricing>> {
        let mut query = property_pricing::Entity::find();
        if let Some(property_id) = &filter.property_id {
            query = query.filter(property_pricing::Column::PropertyId.eq(property_id.as_str()));
        }
        if let Some(pricing_type) = filter.pricing_type {
            query = query.filter(property_pricing::Column::PricingType.eq(pricing_type.as_str()));
        }

        let rows = newest_first(query, property_pricing::Column::CreatedAt)
            .all(&self.db)
            .await?;
        marshal_all(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<PropertyPricing>> {
        property_pricing::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(PropertyPricing::marshal_in)
            .transpose()
    }

    async fn create(&self, draft: NewPropertyPricing) -> Result<PropertyPricing> {
        let now = marshal::now();
        let pricing = PropertyPricing {
            id: generate_id(),
            property_id: draft.property_id,
            pricing_type: draft.pricing_type,
            base_price: draft.base_price,
            currency: draft.currency,
            price_per: draft.price_per,
            negotiable: draft.negotiable,
            price_history: Vec::new(),
            special_offers: draft.special_offers,
            created_at: now,
            updated_at: now,
        };

        let model = pricing
            .marshal_out()?
            .into_active_model()
            .reset_all()
            .insert(&self.db)
            .await?;

        debug!("Created pricing {} for property {}", model.id, model.property_id);
        PropertyPricing::marshal_in(model)
    }

    async fn update(&self, id: &str, patch: PricingPatch) -> Result<Option<PropertyPricing>> {
        let Some(model) = property_pricing::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: property_pricing::ActiveModel = model.clone().into();
        if let Some(pricing_type) = patch.pricing_type {
            active.pricing_type = Set(pricing_type.as_str().to_string());
        }
        if let Some(currency) = patch.currency {
            active.currency = Set(currency);
        }
        if let Some(price_per) = patch.price_per {
            active.price_per = Set(price_per);
        }
        if let Some(negotiable) = patch.negotiable {
            active.negotiable = Set(marshal::flag(negotiable));
        }
        if let Some(offers) = &patch.special_offers {
            active.special_offers = Set(encode_json(offers)?);
        }

        if !active.is_changed() {
            return PropertyPricing::marshal_in(model).map(Some);
        }
        active.updated_at = Set(marshal::encode_timestamp(&marshal::now()));

        let model = active.update(&self.db).await?;
        debug!("Updated pricing {}", id);
        PropertyPricing::marshal_in(model).map(Some)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = property_pricing::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
