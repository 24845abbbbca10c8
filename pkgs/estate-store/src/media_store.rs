//! Photos, videos and virtual tours attached to a property
//!
//! A property has at most one primary media item. Promoting an item demotes
//! the previous primary inside the same transaction, and a partial unique
//! index on `property_media(property_id) WHERE is_primary = 1` backs that
//! up at the storage level.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entities::property_media;
use crate::enums::MediaType;
use crate::error::Result;
use crate::ids::generate_id;
use crate::marshal::{self, marshal_all, Marshal};
use crate::repository::Repository;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyMedia {
    pub id: String,
    pub property_id: String,
    pub media_type: MediaType,
    pub media_url: String,
    pub thumbnail_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPropertyMedia {
    pub property_id: String,
    pub media_type: MediaType,
    pub media_url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub is_primary: bool,
}

/// Fields left `None` are unchanged. On nullable columns `Some(None)`
/// writes NULL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyMediaPatch {
    pub media_type: Option<MediaType>,
    pub media_url: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub thumbnail_url: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub title: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub description: Option<Option<String>>,
    pub display_order: Option<i32>,
    /// `Some(true)` promotes the item and demotes the current primary.
    pub is_primary: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct MediaFilter {
    pub property_id: Option<String>,
    pub media_type: Option<MediaType>,
}

/// Clear the primary flag on every item of a property.
async fn demote_all<C: ConnectionTrait>(conn: &C, property_id: &str) -> Result<()> {
    property_media::Entity::update_many()
        .col_expr(property_media::Column::IsPrimary, Expr::value(0))
        .filter(property_media::Column::PropertyId.eq(property_id))
        .filter(property_media::Column::IsPrimary.eq(1))
        .exec(conn)
        .await?;
    Ok(())
}

/// Store for the `property_media` table
#[derive(Clone)]
pub struct MediaStore {
    db: DatabaseConnection,
}

impl MediaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All media of a property in display order
    pub async fn list_for_property(&self, property_id: &str) -> Result<Vec<PropertyMedia>> {
        self.list(&MediaFilter {
            property_id: Some(property_id.to_string()),
            ..Default::default()
        })
        .await
    }

    /// Make `media_id` the primary item of `property_id`.
    ///
    /// Returns `false` and changes nothing when the item does not belong to
    /// that property.
    pub async fn set_primary(&self, property_id: &str, media_id: &str) -> Result<bool> {
        let txn = self.db.begin().await?;

        let exists = property_media::Entity::find_by_id(media_id.to_string())
            .filter(property_media::Column::PropertyId.eq(property_id))
            .one(&txn)
            .await?
            .is_some();
        if !exists {
            txn.rollback().await?;
            return Ok(false);
        }

        demote_all(&txn, property_id).await?;
        property_media::Entity::update_many()
            .col_expr(property_media::Column::IsPrimary, Expr::value(1))
            .filter(property_media::Column::Id.eq(media_id))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        debug!("Set primary media of {} to {}", property_id, media_id);
        Ok(true)
    }
}

#[async_trait]
impl Repository for MediaStore {
    type Record = PropertyMedia;
    type Draft = NewPropertyMedia;
    type Patch = PropertyMediaPatch;
    type Filter = MediaFilter;

    async fn list(&self, filter: &MediaFilter) -> Result<Vec<PropertyMedia>> {
        let mut query = property_media::Entity::find();
        if let Some(property_id) = &filter.property_id {
            query = query.filter(property_media::Column::PropertyId.eq(property_id.as_str()));
        }
        if let Some(media_type) = filter.media_type {
            query = query.filter(property_media::Column::MediaType.eq(media_type.as_str()));
        }

        let rows = query
            .order_by_asc(property_media::Column::DisplayOrder)
            .order_by_asc(property_media::Column::CreatedAt)
            .all(&self.db)
            .await?;
        marshal_all(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<PropertyMedia>> {
        property_media::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(PropertyMedia::marshal_in)
            .transpose()
    }

    async fn create(&self, draft: NewPropertyMedia) -> Result<PropertyMedia> {
        let media = PropertyMedia {
            id: generate_id(),
            property_id: draft.property_id,
            media_type: draft.media_type,
            media_url: draft.media_url,
            thumbnail_url: draft.thumbnail_url,
            title: draft.title,
            description: draft.description,
            display_order: draft.display_order,
            is_primary: draft.is_primary,
            created_at: marshal::now(),
        };
        let active = media.marshal_out()?.into_active_model().reset_all();

        let txn = self.db.begin().await?;
        if media.is_primary {
            demote_all(&txn, &media.property_id).await?;
        }
        let model = active.insert(&txn).await?;
        txn.commit().await?;

        info!(
            "Added {} media {} to property {}",
            media.media_type, model.id, model.property_id
        );
        PropertyMedia::marshal_in(model)
    }

    async fn update(&self, id: &str, patch: PropertyMediaPatch) -> Result<Option<PropertyMedia>> {
        let txn = self.db.begin().await?;
        let Some(model) = property_media::Entity::find_by_id(id.to_string())
            .one(&txn)
            .await?
        else {
            txn.rollback().await?;
            return Ok(None);
        };

        let mut active: property_media::ActiveModel = model.clone().into();
        if let Some(media_type) = patch.media_type {
            active.media_type = Set(media_type.as_str().to_string());
        }
        if let Some(url) = patch.media_url {
            active.media_url = Set(url);
        }
        if let Some(thumbnail) = patch.thumbnail_url {
            active.thumbnail_url = Set(thumbnail);
        }
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(order) = patch.display_order {
            active.display_order = Set(order);
        }
        if let Some(primary) = patch.is_primary {
            if primary {
                demote_all(&txn, &model.property_id).await?;
            }
            active.is_primary = Set(marshal::flag(primary));
        }

        if !active.is_changed() {
            txn.rollback().await?;
            return PropertyMedia::marshal_in(model).map(Some);
        }

        let model = active.update(&txn).await?;
        txn.commit().await?;
        debug!("Updated media {}", id);
        PropertyMedia::marshal_in(model).map(Some)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = property_media::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
