//! Property listings

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entities::properties;
use crate::enums::PropertyType;
use crate::error::Result;
use crate::ids::generate_id;
use crate::marshal::{self, distinct, encode_json, marshal_all, non_negative, Marshal};
use crate::repository::{newest_first, Repository};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub bedrooms: u32,
    pub bathrooms: f64,
    /// Floor area in square feet
    pub area: f64,
    pub location: String,
    /// Image URLs in display order
    pub images: Vec<String>,
    /// Amenities in display order, without repeats
    pub features: Vec<String>,
    /// Listing user (agent or owner)
    pub agent_id: String,
    pub is_premium_listing: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub area: f64,
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub agent_id: String,
    #[serde(default)]
    pub is_premium_listing: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    pub area: Option<f64>,
    pub location: Option<String>,
    pub images: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub is_premium_listing: Option<bool>,
}

/// Listing search. Every field that is set must match.
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub property_type: Option<PropertyType>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Exact bedroom count
    pub bedrooms: Option<u32>,
    /// Case-insensitive substring of the location
    pub location: Option<String>,
    pub agent_id: Option<String>,
    pub premium_only: bool,
}

/// Store for the `properties` table
#[derive(Clone)]
pub struct PropertyStore {
    db: DatabaseConnection,
}

impl PropertyStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Listings created by one user, newest first
    pub async fn list_by_agent(&self, agent_id: &str) -> Result<Vec<Property>> {
        self.list(&PropertyFilter {
            agent_id: Some(agent_id.to_string()),
            ..Default::default()
        })
        .await
    }
}

#[async_trait]
impl Repository for PropertyStore {
    type Record = Property;
    type Draft = NewProperty;
    type Patch = PropertyPatch;
    type Filter = PropertyFilter;

    async fn list(&self, filter: &PropertyFilter) -> Result<Vec<Property>> {
        let mut query = properties::Entity::find();

        if let Some(property_type) = filter.property_type {
            query = query.filter(properties::Column::PropertyType.eq(property_type.as_str()));
        }
        if let Some(min_price) = filter.min_price {
            query = query.filter(properties::Column::Price.gte(min_price));
        }
        if let Some(max_price) = filter.max_price {
            query = query.filter(properties::Column::Price.lte(max_price));
        }
        if let Some(bedrooms) = filter.bedrooms {
            query = query.filter(properties::Column::Bedrooms.eq(bedrooms));
        }
        if let Some(agent_id) = &filter.agent_id {
            query = query.filter(properties::Column::AgentId.eq(agent_id.as_str()));
        }
        if filter.premium_only {
            query = query.filter(properties::Column::IsPremiumListing.eq(1));
        }

        let mut rows = newest_first(query, properties::Column::CreatedAt)
            .all(&self.db)
            .await?;
        // SQLite folds ASCII case only, so locations are compared here.
        if let Some(location) = &filter.location {
            let needle = location.to_lowercase();
            rows.retain(|row| row.location.to_lowercase().contains(&needle));
        }
        debug!("Property query matched {} rows", rows.len());
        marshal_all(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<Property>> {
        properties::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(Property::marshal_in)
            .transpose()
    }

    async fn create(&self, draft: NewProperty) -> Result<Property> {
        let now = marshal::now();
        let property = Property {
            id: generate_id(),
            title: draft.title,
            description: draft.description,
            price: draft.price,
            property_type: draft.property_type,
            bedrooms: draft.bedrooms,
            bathrooms: draft.bathrooms,
            area: draft.area,
            location: draft.location,
            images: draft.images,
            features: distinct(draft.features),
            agent_id: draft.agent_id,
            is_premium_listing: draft.is_premium_listing,
            created_at: now,
            updated_at: now,
        };

        let model = property
            .marshal_out()?
            .into_active_model()
            .reset_all()
            .insert(&self.db)
            .await?;

        info!("Created property {} ({})", model.id, model.title);
        Property::marshal_in(model)
    }

    async fn update(&self, id: &str, patch: PropertyPatch) -> Result<Option<Property>> {
        let Some(model) = properties::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: properties::ActiveModel = model.clone().into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(price) = patch.price {
            active.price = Set(non_negative("price", price)?);
        }
        if let Some(property_type) = patch.property_type {
            active.property_type = Set(property_type.as_str().to_string());
        }
        if let Some(bedrooms) = patch.bedrooms {
            active.bedrooms = Set(marshal::signed("bedrooms", bedrooms)?);
        }
        if let Some(bathrooms) = patch.bathrooms {
            active.bathrooms = Set(non_negative("bathrooms", bathrooms)?);
        }
        if let Some(area) = patch.area {
            active.area = Set(non_negative("area", area)?);
        }
        if let Some(location) = patch.location {
            active.location = Set(location);
        }
        if let Some(images) = &patch.images {
            active.images = Set(encode_json(images)?);
        }
        if let Some(features) = patch.features {
            active.features = Set(encode_json(&distinct(features))?);
        }
        if let Some(premium) = patch.is_premium_listing {
            active.is_premium_listing = Set(marshal::flag(premium));
        }

        if !active.is_changed() {
            return Property::marshal_in(model).map(Some);
        }
        active.updated_at = Set(marshal::encode_timestamp(&marshal::now()));

        let model = active.update(&self.db).await?;
        debug!("Updated property {}", id);
        Property::marshal_in(model).map(Some)
    }

    /// Media, pricing, placements and favorites of the property go with it.
    async fn delete(&self, id: &str) -> Result<bool> {
        let result = properties::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        if result.rows_affected > 0 {
            info!("Deleted property {}", id);
        }
        Ok(result.rows_affected > 0)
    }
}
