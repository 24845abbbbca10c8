//! Storage-agnostic access to the nine record collections
//!
//! Callers program against [`Repository`] and [`Backend`] so the local
//! SQLite store can be swapped for a remote one without touching them.

use async_trait::async_trait;
use sea_orm::{prelude::Expr, EntityTrait, QueryOrder, Select};

use crate::error::Result;
use crate::favorite_store::{Favorite, FavoriteFilter, NewFavorite};
use crate::featured_store::{
    FeaturedFilter, FeaturedProperty, FeaturedPropertyPatch, NewFeaturedProperty,
};
use crate::media_store::{MediaFilter, NewPropertyMedia, PropertyMedia, PropertyMediaPatch};
use crate::message_store::{Message, MessageFilter, MessagePatch, NewMessage};
use crate::owner_store::{NewOwnerProfile, OwnerProfile, OwnerProfilePatch, OwnerSearch};
use crate::pricing_store::{NewPropertyPricing, PricingFilter, PricingPatch, PropertyPricing};
use crate::property_store::{NewProperty, Property, PropertyFilter, PropertyPatch};
use crate::review_store::{NewOwnerReview, OwnerReview, OwnerReviewPatch, ReviewFilter};
use crate::user_store::{NewUser, User, UserFilter, UserPatch};

/// CRUD over one record collection.
///
/// `get`, `update` and `delete` treat a missing id as a normal outcome:
/// `None` or `false`, never an error.
#[async_trait]
pub trait Repository: Send + Sync {
    type Record: Send;
    /// Caller-supplied fields for a new record. Id and timestamps are
    /// assigned by the repository.
    type Draft: Send;
    /// Fields to change; anything left `None` keeps its stored value.
    type Patch: Send;
    /// Conjunction of optional constraints for `list`.
    type Filter: Send + Sync;

    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Record>>;

    async fn get(&self, id: &str) -> Result<Option<Self::Record>>;

    async fn create(&self, draft: Self::Draft) -> Result<Self::Record>;

    async fn update(&self, id: &str, patch: Self::Patch) -> Result<Option<Self::Record>>;

    async fn delete(&self, id: &str) -> Result<bool>;
}

pub type UserRepository =
    dyn Repository<Record = User, Draft = NewUser, Patch = UserPatch, Filter = UserFilter>;
pub type OwnerProfileRepository = dyn Repository<
    Record = OwnerProfile,
    Draft = NewOwnerProfile,
    Patch = OwnerProfilePatch,
    Filter = OwnerSearch,
>;
pub type PropertyRepository = dyn Repository<
    Record = Property,
    Draft = NewProperty,
    Patch = PropertyPatch,
    Filter = PropertyFilter,
>;
pub type MediaRepository = dyn Repository<
    Record = PropertyMedia,
    Draft = NewPropertyMedia,
    Patch = PropertyMediaPatch,
    Filter = MediaFilter,
>;
pub type FeaturedRepository = dyn Repository<
    Record = FeaturedProperty,
    Draft = NewFeaturedProperty,
    Patch = FeaturedPropertyPatch,
    Filter = FeaturedFilter,
>;
pub type PricingRepository = dyn Repository<
    Record = PropertyPricing,
    Draft = NewPropertyPricing,
    Patch = PricingPatch,
    Filter = PricingFilter,
>;
pub type ReviewRepository = dyn Repository<
    Record = OwnerReview,
    Draft = NewOwnerReview,
    Patch = OwnerReviewPatch,
    Filter = ReviewFilter,
>;
pub type FavoriteRepository =
    dyn Repository<Record = Favorite, Draft = NewFavorite, Patch = (), Filter = FavoriteFilter>;
pub type MessageRepository =
    dyn Repository<Record = Message, Draft = NewMessage, Patch = MessagePatch, Filter = MessageFilter>;

/// A complete data backend: one repository per collection.
pub trait Backend: Send + Sync {
    fn users(&self) -> &UserRepository;
    fn owner_profiles(&self) -> &OwnerProfileRepository;
    fn properties(&self) -> &PropertyRepository;
    fn media(&self) -> &MediaRepository;
    fn featured(&self) -> &FeaturedRepository;
    fn pricing(&self) -> &PricingRepository;
    fn reviews(&self) -> &ReviewRepository;
    fn favorites(&self) -> &FavoriteRepository;
    fn messages(&self) -> &MessageRepository;
}

/// Order by creation time, newest first. Rows created within the same
/// microsecond fall back to insertion order, latest first.
pub(crate) fn newest_first<E: EntityTrait>(select: Select<E>, created_at: E::Column) -> Select<E> {
    select
        .order_by_desc(created_at)
        .order_by_desc(Expr::cust("rowid"))
}
