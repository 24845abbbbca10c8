//! Owner profiles: the business face of a user who lists properties

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entities::{owner_profiles, owner_reviews, properties};
use crate::enums::SubscriptionTier;
use crate::error::Result;
use crate::ids::generate_id;
use crate::marshal::{self, encode_json, marshal_all, Marshal};
use crate::repository::Repository;

/// Opening hours for one day of the week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHours {
    pub open: String,
    pub close: String,
    pub is_open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfile {
    pub id: String,
    pub user_id: String,
    pub business_name: Option<String>,
    pub business_description: Option<String>,
    pub business_logo: Option<String>,
    pub cover_image: Option<String>,
    pub intro_video: Option<String>,
    pub website_url: Option<String>,
    /// Platform name -> profile URL
    pub social_media: BTreeMap<String, String>,
    /// Day name -> hours
    pub business_hours: BTreeMap<String, BusinessHours>,
    pub service_areas: BTreeSet<String>,
    pub specialties: BTreeSet<String>,
    pub years_experience: u32,
    pub total_properties: u32,
    pub rating: f64,
    pub review_count: u32,
    pub is_verified: bool,
    pub subscription_tier: SubscriptionTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOwnerProfile {
    pub user_id: String,
    pub business_name: Option<String>,
    pub business_description: Option<String>,
    pub business_logo: Option<String>,
    pub cover_image: Option<String>,
    pub intro_video: Option<String>,
    pub website_url: Option<String>,
    pub social_media: BTreeMap<String, String>,
    pub business_hours: BTreeMap<String, BusinessHours>,
    pub service_areas: BTreeSet<String>,
    pub specialties: BTreeSet<String>,
    pub years_experience: u32,
    pub subscription_tier: SubscriptionTier,
}

/// Fields left `None` are unchanged. On nullable columns `Some(None)`
/// writes NULL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfilePatch {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub business_name: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub business_description: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub business_logo: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub cover_image: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub intro_video: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub website_url: Option<Option<String>>,
    pub social_media: Option<BTreeMap<String, String>>,
    pub business_hours: Option<BTreeMap<String, BusinessHours>>,
    pub service_areas: Option<BTreeSet<String>>,
    pub specialties: Option<BTreeSet<String>>,
    pub years_experience: Option<u32>,
    pub is_verified: Option<bool>,
    pub subscription_tier: Option<SubscriptionTier>,
}

/// Owner directory search. Location matches any service area containing
/// the text (case-insensitive); specialty matches a specialty exactly,
/// ignoring case.
#[derive(Debug, Clone, Default)]
pub struct OwnerSearch {
    pub location: Option<String>,
    pub specialty: Option<String>,
    pub min_rating: Option<f64>,
    pub verified: Option<bool>,
}

impl OwnerSearch {
    fn matches(&self, profile: &OwnerProfile) -> bool {
        if let Some(location) = &self.location {
            let needle = location.to_lowercase();
            if !profile
                .service_areas
                .iter()
                .any(|area| area.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        if let Some(specialty) = &self.specialty {
            let wanted = specialty.to_lowercase();
            if !profile
                .specialties
                .iter()
                .any(|s| s.to_lowercase() == wanted)
            {
                return false;
            }
        }
        true
    }
}

/// Store for the `owner_profiles` table
#[derive(Clone)]
pub struct OwnerProfileStore {
    db: DatabaseConnection,
}

impl OwnerProfileStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Profile belonging to a user, if any
    pub async fn get_by_user(&self, user_id: &str) -> Result<Option<OwnerProfile>> {
        owner_profiles::Entity::find()
            .filter(owner_profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .map(OwnerProfile::marshal_in)
            .transpose()
    }

    pub async fn update_by_user(
        &self,
        user_id: &str,
        patch: OwnerProfilePatch,
    ) -> Result<Option<OwnerProfile>> {
        let Some(profile) = self.get_by_user(user_id).await? else {
            return Ok(None);
        };
        self.update(&profile.id, patch).await
    }

    pub async fn search(&self, search: &OwnerSearch) -> Result<Vec<OwnerProfile>> {
        self.list(search).await
    }

    /// Recompute listing count, average rating and review count for a
    /// user's profile from the properties and reviews tables.
    pub async fn refresh_stats(&self, user_id: &str) -> Result<Option<OwnerProfile>> {
        let Some(model) = owner_profiles::Entity::find()
            .filter(owner_profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let total_properties = properties::Entity::find()
            .filter(properties::Column::AgentId.eq(user_id))
            .count(&self.db)
            .await?;
        let ratings: Vec<i32> = owner_reviews::Entity::find()
            .filter(owner_reviews::Column::OwnerId.eq(user_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|review| review.rating)
            .collect();

        let review_count = ratings.len();
        let rating = if review_count == 0 {
            0.0
        } else {
            let average = ratings.iter().map(|&r| f64::from(r)).sum::<f64>() / review_count as f64;
            (average * 100.0).round() / 100.0
        };

        let mut active: owner_profiles::ActiveModel = model.into();
        active.total_properties = Set(i32::try_from(total_properties).unwrap_or(i32::MAX));
        active.review_count = Set(i32::try_from(review_count).unwrap_or(i32::MAX));
        active.rating = Set(rating);
        active.updated_at = Set(marshal::encode_timestamp(&marshal::now()));

        let model = active.update(&self.db).await?;
        debug!(
            "Refreshed stats for owner {}: {} properties, {} reviews, rating {}",
            user_id, total_properties, review_count, rating
        );
        OwnerProfile::marshal_in(model).map(Some)
    }
}

#[async_trait]
impl Repository for OwnerProfileStore {
    type Record = OwnerProfile;
    type Draft = NewOwnerProfile;
    type Patch = OwnerProfilePatch;
    type Filter = OwnerSearch;

    async fn list(&self, search: &OwnerSearch) -> Result<Vec<OwnerProfile>> {
        let mut query = owner_profiles::Entity::find();
        if let Some(min_rating) = search.min_rating {
            query = query.filter(owner_profiles::Column::Rating.gte(min_rating));
        }
        if let Some(verified) = search.verified {
            query = query.filter(owner_profiles::Column::IsVerified.eq(marshal::flag(verified)));
        }

        let rows = query
            .order_by_desc(owner_profiles::Column::Rating)
            .order_by_desc(owner_profiles::Column::ReviewCount)
            .order_by_desc(owner_profiles::Column::CreatedAt)
            .all(&self.db)
            .await?;

        // Set membership lives in JSON text, so it is matched after decoding.
        let profiles: Vec<OwnerProfile> = marshal_all(rows)?;
        Ok(profiles.into_iter().filter(|p| search.matches(p)).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<OwnerProfile>> {
        owner_profiles::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(OwnerProfile::marshal_in)
            .transpose()
    }

    async fn create(&self, draft: NewOwnerProfile) -> Result<OwnerProfile> {
        let now = marshal::now();
        let profile = OwnerProfile {
            id: generate_id(),
            user_id: draft.user_id,
            business_name: draft.business_name,
            business_description: draft.business_description,
            business_logo: draft.business_logo,
            cover_image: draft.cover_image,
            intro_video: draft.intro_video,
            website_url: draft.website_url,
            social_media: draft.social_media,
            business_hours: draft.business_hours,
            service_areas: draft.service_areas,
            specialties: draft.specialties,
            years_experience: draft.years_experience,
            total_properties: 0,
            rating: 0.0,
            review_count: 0,
            is_verified: false,
            subscription_tier: draft.subscription_tier,
            created_at: now,
            updated_at: now,
        };

        let model = profile
            .marshal_out()?
            .into_active_model()
            .reset_all()
            .insert(&self.db)
            .await?;

        info!("Created owner profile {} for user {}", model.id, model.user_id);
        OwnerProfile::marshal_in(model)
    }

    async fn update(&self, id: &str, patch: OwnerProfilePatch) -> Result<Option<OwnerProfile>> {
        let Some(model) = owner_profiles::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: owner_profiles::ActiveModel = model.clone().into();
        if let Some(value) = patch.business_name {
            active.business_name = Set(value);
        }
        if let Some(value) = patch.business_description {
            active.business_description = Set(value);
        }
        if let Some(value) = patch.business_logo {
            active.business_logo = Set(value);
        }
        if let Some(value) = patch.cover_image {
            active.cover_image = Set(value);
        }
        if let Some(value) = patch.intro_video {
            active.intro_video = Set(value);
        }
        if let Some(value) = patch.website_url {
            active.website_url = Set(value);
        }
        if let Some(value) = &patch.social_media {
            active.social_media = Set(encode_json(value)?);
        }
        if let Some(value) = &patch.business_hours {
            active.business_hours = Set(encode_json(value)?);
        }
        if let Some(value) = &patch.service_areas {
            active.service_areas = Set(encode_json(value)?);
        }
        if let Some(value) = &patch.specialties {
            active.specialties = Set(encode_json(value)?);
        }
        if let Some(value) = patch.years_experience {
            active.years_experience = Set(marshal::signed("years_experience", value)?);
        }
        if let Some(value) = patch.is_verified {
            active.is_verified = Set(marshal::flag(value));
        }
        if let Some(value) = patch.subscription_tier {
            active.subscription_tier = Set(value.as_str().to_string());
        }

        if !active.is_changed() {
            return OwnerProfile::marshal_in(model).map(Some);
        }
        active.updated_at = Set(marshal::encode_timestamp(&marshal::now()));

        let model = active.update(&self.db).await?;
        debug!("Updated owner profile {}", id);
        OwnerProfile::marshal_in(model).map(Some)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = owner_profiles::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
