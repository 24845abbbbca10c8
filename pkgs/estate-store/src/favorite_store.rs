//! Saved properties per user

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::{favorites, properties};
use crate::error::Result;
use crate::ids::generate_id;
use crate::marshal::{self, marshal_all, Marshal};
use crate::property_store::Property;
use crate::repository::{newest_first, Repository};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: String,
    pub user_id: String,
    pub property_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    pub user_id: String,
    pub property_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct FavoriteFilter {
    pub user_id: Option<String>,
    pub property_id: Option<String>,
}

/// Store for the `favorites` table. A (user, property) pair is saved at
/// most once.
#[derive(Clone)]
pub struct FavoriteStore {
    db: DatabaseConnection,
}

impl FavoriteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Save a property for a user. Fails with `StoreError::Conflict` when
    /// it is already saved.
    pub async fn add(&self, user_id: &str, property_id: &str) -> Result<Favorite> {
        self.create(NewFavorite {
            user_id: user_id.to_string(),
            property_id: property_id.to_string(),
        })
        .await
    }

    /// Returns whether anything was removed.
    pub async fn remove(&self, user_id: &str, property_id: &str) -> Result<bool> {
        let result = favorites::Entity::delete_many()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::PropertyId.eq(property_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn is_favorite(&self, user_id: &str, property_id: &str) -> Result<bool> {
        let count = favorites::Entity::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::PropertyId.eq(property_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Favorite>> {
        self.list(&FavoriteFilter {
            user_id: Some(user_id.to_string()),
            ..Default::default()
        })
        .await
    }

    /// The saved properties themselves, most recently saved first
    pub async fn favorite_properties(&self, user_id: &str) -> Result<Vec<Property>> {
        let rows = favorites::Entity::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .order_by_desc(favorites::Column::CreatedAt)
            .find_also_related(properties::Entity)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .filter_map(|(_, property)| property)
            .map(Property::marshal_in)
            .collect()
    }
}

#[async_trait]
impl Repository for FavoriteStore {
    type Record = Favorite;
    type Draft = NewFavorite;
    /// Favorites have no editable fields.
    type Patch = ();
    type Filter = FavoriteFilter;

    async fn list(&self, filter: &FavoriteFilter) -> Result<Vec<Favorite>> {
        let mut query = favorites::Entity::find();
        if let Some(user_id) = &filter.user_id {
            query = query.filter(favorites::Column::UserId.eq(user_id.as_str()));
        }
        if let Some(property_id) = &filter.property_id {
            query = query.filter(favorites::Column::PropertyId.eq(property_id.as_str()));
        }

        let rows = newest_first(query, favorites::Column::CreatedAt)
            .all(&self.db)
            .await?;
        marshal_all(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<Favorite>> {
        favorites::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(Favorite::marshal_in)
            .transpose()
    }

    async fn create(&self, draft: NewFavorite) -> Result<Favorite> {
        let favorite = Favorite {
            id: generate_id(),
            user_id: draft.user_id,
            property_id: draft.property_id,
            created_at: marshal::now(),
        };

        let model = favorite
            .marshal_out()?
            .into_active_model()
            .reset_all()
            .insert(&self.db)
            .await?;

        debug!("User {} saved property {}", model.user_id, model.property_id);
        Favorite::marshal_in(model)
    }

    async fn update(&self, id: &str, _patch: ()) -> Result<Option<Favorite>> {
        self.get(id).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = favorites::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
