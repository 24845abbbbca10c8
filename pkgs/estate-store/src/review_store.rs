//! Reviews left for owners, with the owner's public response

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entities::owner_reviews;
use crate::error::Result;
use crate::ids::generate_id;
use crate::marshal::{self, marshal_all, Marshal};
use crate::repository::{newest_first, Repository};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReview {
    pub id: String,
    /// Reviewed user
    pub owner_id: String,
    pub reviewer_id: String,
    /// Cleared when the property is deleted
    pub property_id: Option<String>,
    /// 1 to 5 stars
    pub rating: u8,
    pub review_text: Option<String>,
    pub response_text: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOwnerReview {
    pub owner_id: String,
    pub reviewer_id: String,
    #[serde(default)]
    pub property_id: Option<String>,
    pub rating: u8,
    #[serde(default)]
    pub review_text: Option<String>,
}

/// Fields left `None` are unchanged. On nullable columns `Some(None)`
/// writes NULL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReviewPatch {
    pub rating: Option<u8>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub review_text: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub response_text: Option<Option<String>>,
    pub is_verified: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub owner_id: Option<String>,
    pub reviewer_id: Option<String>,
    pub property_id: Option<String>,
    pub verified: Option<bool>,
}

/// Store for the `owner_reviews` table
#[derive(Clone)]
pub struct ReviewStore {
    db: DatabaseConnection,
}

impl ReviewStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach the owner's response to a review.
    pub async fn respond(&self, id: &str, response: &str) -> Result<Option<OwnerReview>> {
        self.update(
            id,
            OwnerReviewPatch {
                response_text: Some(Some(response.to_string())),
                ..Default::default()
            },
        )
        .await
    }
}

#[async_trait]
impl Repository for ReviewStore {
    type Record = OwnerReview;
    type Draft = NewOwnerReview;
    type Patch = OwnerReviewPatch;
    type Filter = ReviewFilter;

    async fn list(&self, filter: &ReviewFilter) -> Result<Vec<OwnerReview>> {
        let mut query = owner_reviews::Entity::find();
        if let Some(owner_id) = &filter.owner_id {
            query = query.filter(owner_reviews::Column::OwnerId.eq(owner_id.as_str()));
        }
        if let Some(reviewer_id) = &filter.reviewer_id {
            query = query.filter(owner_reviews::Column::ReviewerId.eq(reviewer_id.as_str()));
        }
        if let Some(property_id) = &filter.property_id {
            query = query.filter(owner_reviews::Column::PropertyId.eq(property_id.as_str()));
        }
        if let Some(verified) = filter.verified {
            query = query.filter(owner_reviews::Column::IsVerified.eq(marshal::flag(verified)));
        }

        let rows = newest_first(query, owner_reviews::Column::CreatedAt)
            .all(&self.db)
            .await?;
        marshal_all(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<OwnerReview>> {
        owner_reviews::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(OwnerReview::marshal_in)
            .transpose()
    }

    async fn create(&self, draft: NewOwnerReview) -> Result<OwnerReview> {
        let now = marshal::now();
        let review = OwnerReview {
            id: generate_id(),
            owner_id: draft.owner_id,
            reviewer_id: draft.reviewer_id,
            property_id: draft.property_id,
            rating: draft.rating,
            review_text: draft.review_text,
            response_text: None,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };

        let model = review
            .marshal_out()?
            .into_active_model()
            .reset_all()
            .insert(&self.db)
            .await?;

        info!(
            "Review {} for owner {} ({} stars)",
            model.id, model.owner_id, model.rating
        );
        OwnerReview::marshal_in(model)
    }

    async fn update(&self, id: &str, patch: OwnerReviewPatch) -> Result<Option<OwnerReview>> {
        let rating = patch.rating.map(marshal::rating).transpose()?;
        let Some(model) = owner_reviews::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: owner_reviews::ActiveModel = model.clone().into();
        if let Some(rating) = rating {
            active.rating = Set(rating);
        }
        if let Some(text) = patch.review_text {
            active.review_text = Set(text);
        }
        if let Some(text) = patch.response_text {
            active.response_text = Set(text);
        }
        if let Some(verified) = patch.is_verified {
            active.is_verified = Set(marshal::flag(verified));
        }

        if !active.is_changed() {
            return OwnerReview::marshal_in(model).map(Some);
        }
        active.updated_at = Set(marshal::encode_timestamp(&marshal::now()));

        let model = active.update(&self.db).await?;
        debug!("Updated review {}", id);
        OwnerReview::marshal_in(model).map(Some)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = owner_reviews::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
