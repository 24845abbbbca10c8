//! Paid placements for properties (homepage hero, premium listing,
//! sponsored)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Select, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entities::{featured_properties, properties};
use crate::enums::{FeatureType, PaymentStatus};
use crate::error::Result;
use crate::ids::generate_id;
use crate::marshal::{self, marshal_all, non_negative, Marshal};
use crate::property_store::Property;
use crate::repository::Repository;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedProperty {
    pub id: String,
    pub property_id: String,
    pub owner_id: String,
    pub feature_type: FeatureType,
    pub start_date: DateTime<Utc>,
    /// Open-ended when `None`
    pub end_date: Option<DateTime<Utc>>,
    pub priority: i32,
    pub payment_amount: Option<f64>,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl FeaturedProperty {
    /// A placement is live once paid and until its end date passes.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.payment_status == PaymentStatus::Paid && self.end_date.map_or(true, |end| end > at)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeaturedProperty {
    pub property_id: String,
    pub owner_id: String,
    pub feature_type: FeatureType,
    /// Defaults to the creation time
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub payment_amount: Option<f64>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
}

/// Fields left `None` are unchanged. On nullable columns `Some(None)`
/// writes NULL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedPropertyPatch {
    pub feature_type: Option<FeatureType>,
    pub start_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub priority: Option<i32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub payment_amount: Option<Option<f64>>,
    pub payment_status: Option<PaymentStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct FeaturedFilter {
    pub feature_type: Option<FeatureType>,
    pub owner_id: Option<String>,
    pub property_id: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    /// Only placements live right now
    pub active_only: bool,
}

/// A live placement together with the property it promotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedListing {
    pub featured: FeaturedProperty,
    pub property: Property,
}

fn active_condition(now: &DateTime<Utc>) -> Condition {
    Condition::all()
        .add(featured_properties::Column::PaymentStatus.eq(PaymentStatus::Paid.as_str()))
        .add(
            Condition::any()
                .add(featured_properties::Column::EndDate.is_null())
                .add(featured_properties::Column::EndDate.gt(marshal::encode_timestamp(now))),
        )
}

fn by_priority(select: Select<featured_properties::Entity>) -> Select<featured_properties::Entity> {
    select
        .order_by_desc(featured_properties::Column::Priority)
        .order_by_desc(featured_properties::Column::CreatedAt)
}

/// Store for the `featured_properties` table
#[derive(Clone)]
pub struct FeaturedStore {
    db: DatabaseConnection,
}

impl FeaturedStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Live placements joined with their properties, highest priority
    /// first.
    pub async fn list_active(
        &self,
        feature_type: Option<FeatureType>,
    ) -> Result<Vec<FeaturedListing>> {
        let mut query =
            featured_properties::Entity::find().filter(active_condition(&marshal::now()));
        if let Some(feature_type) = feature_type {
            query = query.filter(featured_properties::Column::FeatureType.eq(feature_type.as_str()));
        }

        let rows = by_priority(query)
            .find_also_related(properties::Entity)
            .all(&self.db)
            .await?;

        let mut listings = Vec::with_capacity(rows.len());
        for (featured, property) in rows {
            // Cascading deletes keep this join total.
            let Some(property) = property else {
                continue;
            };
            listings.push(FeaturedListing {
                featured: FeaturedProperty::marshal_in(featured)?,
                property: Property::marshal_in(property)?,
            });
        }
        Ok(listings)
    }

    /// Mark paid placements whose end date has passed as expired.
    /// Returns the number of placements changed.
    pub async fn expire_lapsed(&self) -> Result<u64> {
        let now = marshal::encode_timestamp(&marshal::now());
        let result = featured_properties::Entity::update_many()
            .col_expr(
                featured_properties::Column::PaymentStatus,
                Expr::value(PaymentStatus::Expired.as_str()),
            )
            .filter(featured_properties::Column::PaymentStatus.eq(PaymentStatus::Paid.as_str()))
            .filter(featured_properties::Column::EndDate.is_not_null())
            .filter(featured_properties::Column::EndDate.lte(now))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            info!("Expired {} featured placements", result.rows_affected);
        }
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl Repository for FeaturedStore {
    type Record = FeaturedProperty;
    type Draft = NewFeaturedProperty;
    type Patch = FeaturedPropertyPatch;
    type Filter = FeaturedFilter;

    async fn list(&self, filter: &FeaturedFilter) -> Result<Vec<FeaturedProperty>> {
        let mut query = featured_properties::Entity::find();
        if let Some(feature_type) = filter.feature_type {
            query = query.filter(featured_properties::Column::FeatureType.eq(feature_type.as_str()));
        }
        if let Some(owner_id) = &filter.owner_id {
            query = query.filter(featured_properties::Column::OwnerId.eq(owner_id.as_str()));
        }
        if let Some(property_id) = &filter.property_id {
            query = query.filter(featured_properties::Column::PropertyId.eq(property_id.as_str()));
        }
        if let Some(status) = filter.payment_status {
            query = query.filter(featured_properties::Column::PaymentStatus.eq(status.as_str()));
        }
        if filter.active_only {
            query = query.filter(active_condition(&marshal::now()));
        }

        let rows = by_priority(query).all(&self.db).await?;
        marshal_all(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<FeaturedProperty>> {
        featured_properties::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(FeaturedProperty::marshal_in)
            .transpose()
    }

    async fn create(&self, draft: NewFeaturedProperty) -> Result<FeaturedProperty> {
        let now = marshal::now();
        let featured = FeaturedProperty {
            id: generate_id(),
            property_id: draft.property_id,
            owner_id: draft.owner_id,
            feature_type: draft.feature_type,
            start_date: draft.start_date.unwrap_or(now),
            end_date: draft.end_date,
            priority: draft.priority,
            payment_amount: draft.payment_amount,
            payment_status: draft.payment_status,
            created_at: now,
        };

        let model = featured
            .marshal_out()?
            .into_active_model()
            .reset_all()
            .insert(&self.db)
            .await?;

        info!(
            "Featured property {} as {} ({})",
            model.property_id, model.feature_type, model.payment_status
        );
        FeaturedProperty::marshal_in(model)
    }

    async fn update(
        &self,
        id: &str,
        patch: FeaturedPropertyPatch,
    ) -> Result<Option<FeaturedProperty>> {
        let Some(model) = featured_properties::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: featured_properties::ActiveModel = model.clone().into();
        if let Some(feature_type) = patch.feature_type {
            active.feature_type = Set(feature_type.as_str().to_string());
        }
        if let Some(start) = &patch.start_date {
            active.start_date = Set(marshal::encode_timestamp(start));
        }
        if let Some(end) = &patch.end_date {
            active.end_date = Set(end.as_ref().map(marshal::encode_timestamp));
        }
        if let Some(priority) = patch.priority {
            active.priority = Set(priority);
        }
        if let Some(amount) = patch.payment_amount {
            active.payment_amount = Set(amount
                .map(|amount| non_negative("payment_amount", amount))
                .transpose()?);
        }
        if let Some(status) = patch.payment_status {
            active.payment_status = Set(status.as_str().to_string());
        }

        if !active.is_changed() {
            return FeaturedProperty::marshal_in(model).map(Some);
        }

        let model = active.update(&self.db).await?;
        debug!("Updated featured placement {}", id);
        FeaturedProperty::marshal_in(model).map(Some)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = featured_properties::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn placement(status: PaymentStatus, end_date: Option<DateTime<Utc>>) -> FeaturedProperty {
        FeaturedProperty {
            id: "f".into(),
            property_id: "p".into(),
            owner_id: "o".into(),
            feature_type: FeatureType::HomepageHero,
            start_date: marshal::now(),
            end_date,
            priority: 0,
            payment_amount: None,
            payment_status: status,
            created_at: marshal::now(),
        }
    }

    #[test]
    fn test_active_rule() {
        let now = marshal::now();
        let tomorrow = Some(now + Duration::days(1));
        let yesterday = Some(now - Duration::days(1));

        assert!(placement(PaymentStatus::Paid, None).is_active_at(now));
        assert!(placement(PaymentStatus::Paid, tomorrow).is_active_at(now));
        assert!(!placement(PaymentStatus::Paid, yesterday).is_active_at(now));
        assert!(!placement(PaymentStatus::Paid, Some(now)).is_active_at(now));
        assert!(!placement(PaymentStatus::Pending, tomorrow).is_active_at(now));
        assert!(!placement(PaymentStatus::Expired, None).is_active_at(now));
    }

    #[test]
    fn test_patch_null_clears_missing_keeps() {
        let keep: FeaturedPropertyPatch = serde_json::from_str(r#"{"priority":2}"#).unwrap();
        assert_eq!(keep.end_date, None);
        assert_eq!(keep.payment_amount, None);

        let clear: FeaturedPropertyPatch =
            serde_json::from_str(r#"{"endDate":null,"paymentAmount":null}"#).unwrap();
        assert_eq!(clear.end_date, Some(None));
        assert_eq!(clear.payment_amount, Some(None));

        let set: FeaturedPropertyPatch =
            serde_json::from_str(r#"{"endDate":"2030-01-01T00:00:00Z"}"#).unwrap();
        assert!(matches!(set.end_date, Some(Some(_))));

        let json = serde_json::to_value(&clear).unwrap();
        assert!(json.get("endDate").is_some_and(|v| v.is_null()));
        let json = serde_json::to_value(&keep).unwrap();
        assert!(json.get("endDate").is_none());
    }
}
