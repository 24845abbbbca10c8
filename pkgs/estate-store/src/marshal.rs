//! Record marshaling between storage rows and application records
//!
//! Storage rows (`crate::entities::*::Model`) use snake_case columns, 0/1
//! integers for flags, JSON text for structured values and RFC 3339 text
//! for timestamps. Application records use camelCase on the wire, real
//! booleans, native collections and `DateTime<Utc>`. Every conversion in
//! either direction goes through this module.
//!
//! Rows written by [`Marshal::marshal_out`] are canonical: reading one back
//! with [`Marshal::marshal_in`] and writing it out again reproduces it
//! exactly, and the same holds starting from a record.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::entities::{
    favorites, featured_properties, messages, owner_profiles, owner_reviews, properties,
    property_media, property_pricing, users,
};
use crate::error::{Result, StoreError};
use crate::favorite_store::Favorite;
use crate::featured_store::FeaturedProperty;
use crate::media_store::PropertyMedia;
use crate::message_store::Message;
use crate::owner_store::OwnerProfile;
use crate::pricing_store::PropertyPricing;
use crate::property_store::Property;
use crate::review_store::OwnerReview;
use crate::user_store::User;

/// Conversion between an application record and its storage row.
pub trait Marshal: Sized {
    /// Storage row type.
    type Row;

    /// Table name, used in error and log messages.
    const TABLE: &'static str;

    /// Storage row -> application record.
    fn marshal_in(row: Self::Row) -> Result<Self>;

    /// Application record -> storage row.
    fn marshal_out(&self) -> Result<Self::Row>;
}

/// Current time at the precision timestamps are stored with.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub(crate) fn encode_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_timestamp(
    table: &'static str,
    column: &'static str,
    text: &str,
) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt {
            table,
            column,
            reason: format!("{text:?}: {e}"),
        })
}

fn decode_optional_timestamp(
    table: &'static str,
    column: &'static str,
    text: Option<&str>,
) -> Result<Option<DateTime<Utc>>> {
    text.map(|t| decode_timestamp(table, column, t)).transpose()
}

pub(crate) fn flag(value: bool) -> i32 {
    i32::from(value)
}

pub(crate) fn is_set(value: i32) -> bool {
    value != 0
}

pub(crate) fn encode_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decode a JSON text column.
///
/// Empty or unparsable text yields `T::default()` so a damaged optional
/// column never fails the whole read.
pub(crate) fn decode_json<T>(table: &'static str, column: &'static str, text: &str) -> T
where
    T: DeserializeOwned + Default,
{
    if text.trim().is_empty() {
        return T::default();
    }
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            warn!("Malformed JSON in {}.{}, using default: {}", table, column, e);
            T::default()
        }
    }
}

/// Drop repeated entries, keeping the first occurrence of each in place.
pub(crate) fn distinct(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

fn parse_enum<T>(table: &'static str, column: &'static str, text: &str) -> Result<T>
where
    T: std::str::FromStr<Err = StoreError>,
{
    text.parse().map_err(|_| StoreError::Corrupt {
        table,
        column,
        reason: format!("unknown value {text:?}"),
    })
}

fn unsigned(table: &'static str, column: &'static str, value: i32) -> Result<u32> {
    u32::try_from(value).map_err(|_| StoreError::Corrupt {
        table,
        column,
        reason: format!("negative value {value}"),
    })
}

pub(crate) fn signed(field: &'static str, value: u32) -> Result<i32> {
    i32::try_from(value).map_err(|_| StoreError::invalid(field, value))
}

/// Reject NaN, infinities and negative values.
pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(StoreError::invalid(field, value))
    }
}

pub(crate) fn rating(value: u8) -> Result<i32> {
    if (1..=5).contains(&value) {
        Ok(i32::from(value))
    } else {
        Err(StoreError::invalid("rating", value))
    }
}

impl Marshal for User {
    type Row = users::Model;
    const TABLE: &'static str = "users";

    fn marshal_in(row: users::Model) -> Result<Self> {
        Ok(User {
            created_at: decode_timestamp(Self::TABLE, "created_at", &row.created_at)?,
            updated_at: decode_timestamp(Self::TABLE, "updated_at", &row.updated_at)?,
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            avatar_url: row.avatar_url,
            phone: row.phone,
            bio: row.bio,
            is_agent: is_set(row.is_agent),
            is_owner: is_set(row.is_owner),
            password_hash: row.password_hash,
        })
    }

    fn marshal_out(&self) -> Result<users::Model> {
        Ok(users::Model {
            id: self.id.clone(),
            email: self.email.clone(),
            password_hash: self.password_hash.clone(),
            full_name: self.full_name.clone(),
            avatar_url: self.avatar_url.clone(),
            phone: self.phone.clone(),
            bio: self.bio.clone(),
            is_agent: flag(self.is_agent),
            is_owner: flag(self.is_owner),
            created_at: encode_timestamp(&self.created_at),
            updated_at: encode_timestamp(&self.updated_at),
        })
    }
}

impl Marshal for OwnerProfile {
    type Row = owner_profiles::Model;
    const TABLE: &'static str = "owner_profiles";

    fn marshal_in(row: owner_profiles::Model) -> Result<Self> {
        let t = Self::TABLE;
        Ok(OwnerProfile {
            social_media: decode_json(t, "social_media", &row.social_media),
            business_hours: decode_json(t, "business_hours", &row.business_hours),
            service_areas: decode_json(t, "service_areas", &row.service_areas),
            specialties: decode_json(t, "specialties", &row.specialties),
            years_experience: unsigned(t, "years_experience", row.years_experience)?,
            total_properties: unsigned(t, "total_properties", row.total_properties)?,
            review_count: unsigned(t, "review_count", row.review_count)?,
            subscription_tier: parse_enum(t, "subscription_tier", &row.subscription_tier)?,
            created_at: decode_timestamp(t, "created_at", &row.created_at)?,
            updated_at: decode_timestamp(t, "updated_at", &row.updated_at)?,
            id: row.id,
            user_id: row.user_id,
            business_name: row.business_name,
            business_description: row.business_description,
            business_logo: row.business_logo,
            cover_image: row.cover_image,
            intro_video: row.intro_video,
            website_url: row.website_url,
            rating: row.rating,
            is_verified: is_set(row.is_verified),
        })
    }

    fn marshal_out(&self) -> Result<owner_profiles::Model> {
        Ok(owner_profiles::Model {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            business_name: self.business_name.clone(),
            business_description: self.business_description.clone(),
            business_logo: self.business_logo.clone(),
            cover_image: self.cover_image.clone(),
            intro_video: self.intro_video.clone(),
            website_url: self.website_url.clone(),
            social_media: encode_json(&self.social_media)?,
            business_hours: encode_json(&self.business_hours)?,
            service_areas: encode_json(&self.service_areas)?,
            specialties: encode_json(&self.specialties)?,
            years_experience: signed("years_experience", self.years_experience)?,
            total_properties: signed("total_properties", self.total_properties)?,
            rating: self.rating,
            review_count: signed("review_count", self.review_count)?,
            is_verified: flag(self.is_verified),
            subscription_tier: self.subscription_tier.as_str().to_string(),
            created_at: encode_timestamp(&self.created_at),
            updated_at: encode_timestamp(&self.updated_at),
        })
    }
}

impl Marshal for Property {
    type Row = properties::Model;
    const TABLE: &'static str = "properties";

    fn marshal_in(row: properties::Model) -> Result<Self> {
        let t = Self::TABLE;
        Ok(Property {
            property_type: parse_enum(t, "type", &row.property_type)?,
            bedrooms: unsigned(t, "bedrooms", row.bedrooms)?,
            images: decode_json(t, "images", &row.images),
            features: distinct(decode_json(t, "features", &row.features)),
            is_premium_listing: is_set(row.is_premium_listing),
            created_at: decode_timestamp(t, "created_at", &row.created_at)?,
            updated_at: decode_timestamp(t, "updated_at", &row.updated_at)?,
            id: row.id,
            title: row.title,
            description: row.description,
            price: row.price,
            bathrooms: row.bathrooms,
            area: row.area,
            location: row.location,
            agent_id: row.agent_id,
        })
    }

    fn marshal_out(&self) -> Result<properties::Model> {
        Ok(properties::Model {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            price: non_negative("price", self.price)?,
            property_type: self.property_type.as_str().to_string(),
            bedrooms: signed("bedrooms", self.bedrooms)?,
            bathrooms: non_negative("bathrooms", self.bathrooms)?,
            area: non_negative("area", self.area)?,
            location: self.location.clone(),
            images: encode_json(&self.images)?,
            features: encode_json(&distinct(self.features.clone()))?,
            agent_id: self.agent_id.clone(),
            is_premium_listing: flag(self.is_premium_listing),
            created_at: encode_timestamp(&self.created_at),
            updated_at: encode_timestamp(&self.updated_at),
        })
    }
}

impl Marshal for PropertyMedia {
    type Row = property_media::Model;
    const TABLE: &'static str = "property_media";

    fn marshal_in(row: property_media::Model) -> Result<Self> {
        Ok(PropertyMedia {
            media_type: parse_enum(Self::TABLE, "media_type", &row.media_type)?,
            created_at: decode_timestamp(Self::TABLE, "created_at", &row.created_at)?,
            id: row.id,
            property_id: row.property_id,
            media_url: row.media_url,
            thumbnail_url: row.thumbnail_url,
            title: row.title,
            description: row.description,
            display_order: row.display_order,
            is_primary: is_set(row.is_primary),
        })
    }

    fn marshal_out(&self) -> Result<property_media::Model> {
        Ok(property_media::Model {
            id: self.id.clone(),
            property_id: self.property_id.clone(),
            media_type: self.media_type.as_str().to_string(),
            media_url: self.media_url.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            display_order: self.display_order,
            is_primary: flag(self.is_primary),
            created_at: encode_timestamp(&self.created_at),
        })
    }
}

impl Marshal for FeaturedProperty {
    type Row = featured_properties::Model;
    const TABLE: &'static str = "featured_properties";

    fn marshal_in(row: featured_properties::Model) -> Result<Self> {
        let t = Self::TABLE;
        Ok(FeaturedProperty {
            feature_type: parse_enum(t, "feature_type", &row.feature_type)?,
            payment_status: parse_enum(t, "payment_status", &row.payment_status)?,
            start_date: decode_timestamp(t, "start_date", &row.start_date)?,
            end_date: decode_optional_timestamp(t, "end_date", row.end_date.as_deref())?,
            created_at: decode_timestamp(t, "created_at", &row.created_at)?,
            id: row.id,
            property_id: row.property_id,
            owner_id: row.owner_id,
            priority: row.priority,
            payment_amount: row.payment_amount,
        })
    }

    fn marshal_out(&self) -> Result<featured_properties::Model> {
        Ok(featured_properties::Model {
            id: self.id.clone(),
            property_id: self.property_id.clone(),
            owner_id: self.owner_id.clone(),
            feature_type: self.feature_type.as_str().to_string(),
            start_date: encode_timestamp(&self.start_date),
            end_date: self.end_date.as_ref().map(encode_timestamp),
            priority: self.priority,
            payment_amount: self
                .payment_amount
                .map(|amount| non_negative("payment_amount", amount))
                .transpose()?,
            payment_status: self.payment_status.as_str().to_string(),
            created_at: encode_timestamp(&self.created_at),
        })
    }
}

impl Marshal for PropertyPricing {
    type Row = property_pricing::Model;
    const TABLE: &'static str = "property_pricing";

    fn marshal_in(row: property_pricing::Model) -> Result<Self> {
        let t = Self::TABLE;
        Ok(PropertyPricing {
            pricing_type: parse_enum(t, "pricing_type", &row.pricing_type)?,
            negotiable: is_set(row.negotiable),
            price_history: decode_json(t, "price_history", &row.price_history),
            special_offers: decode_json(t, "special_offers", &row.special_offers),
            created_at: decode_timestamp(t, "created_at", &row.created_at)?,
            updated_at: decode_timestamp(t, "updated_at", &row.updated_at)?,
            id: row.id,
            property_id: row.property_id,
            base_price: row.base_price,
            currency: row.currency,
            price_per: row.price_per,
        })
    }

    fn marshal_out(&self) -> Result<property_pricing::Model> {
        Ok(property_pricing::Model {
            id: self.id.clone(),
            property_id: self.property_id.clone(),
            pricing_type: self.pricing_type.as_str().to_string(),
            base_price: non_negative("base_price", self.base_price)?,
            currency: self.currency.clone(),
            price_per: self.price_per.clone(),
            negotiable: flag(self.negotiable),
            price_history: encode_json(&self.price_history)?,
            special_offers: encode_json(&self.special_offers)?,
            created_at: encode_timestamp(&self.created_at),
            updated_at: encode_timestamp(&self.updated_at),
        })
    }
}

impl Marshal for OwnerReview {
    type Row = owner_reviews::Model;
    const TABLE: &'static str = "owner_reviews";

    fn marshal_in(row: owner_reviews::Model) -> Result<Self> {
        let t = Self::TABLE;
        let rating = u8::try_from(row.rating)
            .ok()
            .filter(|r| (1..=5).contains(r))
            .ok_or_else(|| StoreError::Corrupt {
                table: t,
                column: "rating",
                reason: format!("out of range: {}", row.rating),
            })?;
        Ok(OwnerReview {
            rating,
            is_verified: is_set(row.is_verified),
            created_at: decode_timestamp(t, "created_at", &row.created_at)?,
            updated_at: decode_timestamp(t, "updated_at", &row.updated_at)?,
            id: row.id,
            owner_id: row.owner_id,
            reviewer_id: row.reviewer_id,
            property_id: row.property_id,
            review_text: row.review_text,
            response_text: row.response_text,
        })
    }

    fn marshal_out(&self) -> Result<owner_reviews::Model> {
        Ok(owner_reviews::Model {
            id: self.id.clone(),
            owner_id: self.owner_id.clone(),
            reviewer_id: self.reviewer_id.clone(),
            property_id: self.property_id.clone(),
            rating: rating(self.rating)?,
            review_text: self.review_text.clone(),
            response_text: self.response_text.clone(),
            is_verified: flag(self.is_verified),
            created_at: encode_timestamp(&self.created_at),
            updated_at: encode_timestamp(&self.updated_at),
        })
    }
}

impl Marshal for Favorite {
    type Row = favorites::Model;
    const TABLE: &'static str = "favorites";

    fn marshal_in(row: favorites::Model) -> Result<Self> {
        Ok(Favorite {
            created_at: decode_timestamp(Self::TABLE, "created_at", &row.created_at)?,
            id: row.id,
            user_id: row.user_id,
            property_id: row.property_id,
        })
    }

    fn marshal_out(&self) -> Result<favorites::Model> {
        Ok(favorites::Model {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            property_id: self.property_id.clone(),
            created_at: encode_timestamp(&self.created_at),
        })
    }
}

impl Marshal for Message {
    type Row = messages::Model;
    const TABLE: &'static str = "messages";

    fn marshal_in(row: messages::Model) -> Result<Self> {
        Ok(Message {
            read: is_set(row.read),
            created_at: decode_timestamp(Self::TABLE, "created_at", &row.created_at)?,
            id: row.id,
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            property_id: row.property_id,
            content: row.content,
        })
    }

    fn marshal_out(&self) -> Result<messages::Model> {
        Ok(messages::Model {
            id: self.id.clone(),
            sender_id: self.sender_id.clone(),
            receiver_id: self.receiver_id.clone(),
            property_id: self.property_id.clone(),
            content: self.content.clone(),
            read: flag(self.read),
            created_at: encode_timestamp(&self.created_at),
        })
    }
}

/// Marshal every row of a query result.
pub(crate) fn marshal_all<T: Marshal>(rows: Vec<T::Row>) -> Result<Vec<T>> {
    rows.into_iter().map(T::marshal_in).collect()
}
