//! Sea-ORM entities for estate-store
//!
//! Models here are the storage shape of each table: flags are 0/1
//! integers, structured values are JSON text and timestamps are RFC 3339
//! text. Conversion to application records lives in `crate::marshal`.

pub mod favorites;
pub mod featured_properties;
pub mod messages;
pub mod owner_profiles;
pub mod owner_reviews;
pub mod properties;
pub mod property_media;
pub mod property_pricing;
pub mod users;

pub use favorites::Entity as Favorites;
pub use featured_properties::Entity as FeaturedProperties;
pub use messages::Entity as Messages;
pub use owner_profiles::Entity as OwnerProfiles;
pub use owner_reviews::Entity as OwnerReviews;
pub use properties::Entity as Properties;
pub use property_media::Entity as PropertyMedia;
pub use property_pricing::Entity as PropertyPricing;
pub use users::Entity as Users;
