//! Estate Store - local persistence for a real-estate marketplace
//!
//! This crate keeps users, owner profiles, listings and everything hanging
//! off them in one embedded SQLite file, using Sea-ORM.
//!
//! # Architecture
//!
//! - **entities / migration**: storage shape of the nine tables and the
//!   migrations that create them
//! - **marshal**: the single conversion point between storage rows and
//!   application records
//! - **Repository / Backend**: storage-agnostic CRUD traits; `LocalStore`
//!   is the SQLite implementation
//! - one store per table: `UserStore`, `OwnerProfileStore`,
//!   `PropertyStore`, `MediaStore`, `FeaturedStore`, `PricingStore`,
//!   `ReviewStore`, `FavoriteStore`, `MessageStore`
//! - **AuthManager**: local email/password sign-in over the users table
//! - **seed**: demo data for an empty database
//!
//! # Database Schema
//!
//! - `users`, `owner_profiles` (one per user)
//! - `properties`, with `property_media`, `featured_properties` and
//!   `property_pricing` deleted along with their property
//! - `owner_reviews`, `favorites` (unique per user and property),
//!   `messages`
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use estate_store::{
//!     Backend, LocalStore, PropertyFilter, PropertyType, Repository, StoreConfig,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = LocalStore::open(StoreConfig {
//!     db_path: "estate.db".into(),
//!     seed_sample_data: true,
//!     ..Default::default()
//! })
//! .await?;
//!
//! let rentals = store
//!     .properties()
//!     .list(&PropertyFilter {
//!         property_type: Some(PropertyType::Rent),
//!         max_price: Some(3000.0),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{} rentals", rentals.len());
//! # Ok(())
//! # }
//! ```

pub mod auth_manager;
pub mod entities;
pub mod enums;
pub mod error;
pub mod favorite_store;
pub mod featured_store;
pub mod ids;
pub mod local_store;
pub mod marshal;
pub mod media_store;
pub mod message_store;
pub mod migration;
pub mod owner_store;
pub mod pricing_store;
pub mod property_store;
pub mod repository;
pub mod review_store;
pub mod seed;
pub mod user_store;

pub use auth_manager::{AuthManager, Session};
pub use enums::{FeatureType, MediaType, PaymentStatus, PricingType, PropertyType, SubscriptionTier};
pub use error::{Result, StoreError};
pub use favorite_store::{Favorite, FavoriteFilter, FavoriteStore, NewFavorite};
pub use featured_store::{
    FeaturedFilter, FeaturedListing, FeaturedProperty, FeaturedPropertyPatch, FeaturedStore,
    NewFeaturedProperty,
};
pub use ids::generate_id;
pub use local_store::LocalStore;
pub use marshal::Marshal;
pub use media_store::{MediaFilter, MediaStore, NewPropertyMedia, PropertyMedia, PropertyMediaPatch};
pub use message_store::{Conversation, Message, MessageFilter, MessagePatch, MessageStore, NewMessage};
pub use owner_store::{
    BusinessHours, NewOwnerProfile, OwnerProfile, OwnerProfilePatch, OwnerProfileStore,
    OwnerSearch,
};
pub use pricing_store::{
    NewPropertyPricing, PriceChange, PricingFilter, PricingPatch, PricingStore, PropertyPricing,
    SpecialOffer,
};
pub use property_store::{NewProperty, Property, PropertyFilter, PropertyPatch, PropertyStore};
pub use repository::{Backend, Repository};
pub use review_store::{NewOwnerReview, OwnerReview, OwnerReviewPatch, ReviewFilter, ReviewStore};
pub use seed::{seed_sample_data, SeedOutcome, DEMO_PASSWORD};
pub use user_store::{NewUser, User, UserFilter, UserPatch, UserStore};

/// Configuration for the local store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    pub db_path: std::path::PathBuf,

    /// Connection pool size (default: 1)
    pub max_connections: u32,

    /// Insert demo data when the database has no users (default: false)
    pub seed_sample_data: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::path::PathBuf::from("estate.db"),
            max_connections: 1,
            seed_sample_data: false,
        }
    }
}
