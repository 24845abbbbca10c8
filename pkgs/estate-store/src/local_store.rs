//! Embedded SQLite backend

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::auth_manager::AuthManager;
use crate::error::{Result, StoreError};
use crate::favorite_store::FavoriteStore;
use crate::featured_store::FeaturedStore;
use crate::media_store::MediaStore;
use crate::message_store::MessageStore;
use crate::migration::Migrator;
use crate::owner_store::OwnerProfileStore;
use crate::pricing_store::PricingStore;
use crate::property_store::PropertyStore;
use crate::repository::{
    Backend, FavoriteRepository, FeaturedRepository, MediaRepository, MessageRepository,
    OwnerProfileRepository, PricingRepository, PropertyRepository, ReviewRepository,
    UserRepository,
};
use crate::review_store::ReviewStore;
use crate::seed::{seed_sample_data, SeedOutcome};
use crate::user_store::UserStore;
use crate::StoreConfig;

/// All stores over one SQLite connection.
pub struct LocalStore {
    db: DatabaseConnection,
    users: UserStore,
    owner_profiles: OwnerProfileStore,
    properties: PropertyStore,
    media: MediaStore,
    featured: FeaturedStore,
    pricing: PricingStore,
    reviews: ReviewStore,
    favorites: FavoriteStore,
    messages: MessageStore,
}

impl LocalStore {
    /// Open (creating if needed) the database file, bring the schema up to
    /// date and optionally seed demo data.
    pub async fn open(config: StoreConfig) -> Result<Self> {
        let db_path = config.db_path.to_str().ok_or_else(|| {
            StoreError::invalid("db_path", config.db_path.display())
        })?;
        let db_url = format!("sqlite:{}?mode=rwc", db_path.replace('\\', "/"));

        let mut options = ConnectOptions::new(db_url);
        options
            .max_connections(config.max_connections)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(options).await?;
        let store = Self::with_connection(db).await?;
        info!("Estate store opened at {}", config.db_path.display());

        if config.seed_sample_data {
            store.seed().await?;
        }
        Ok(store)
    }

    /// Use an existing connection. Migrations are applied; they are a no-op
    /// on an up-to-date schema.
    pub async fn with_connection(db: DatabaseConnection) -> Result<Self> {
        db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
        Migrator::up(&db, None).await?;
        debug!("Estate store schema is up to date");

        Ok(Self {
            users: UserStore::new(db.clone()),
            owner_profiles: OwnerProfileStore::new(db.clone()),
            properties: PropertyStore::new(db.clone()),
            media: MediaStore::new(db.clone()),
            featured: FeaturedStore::new(db.clone()),
            pricing: PricingStore::new(db.clone()),
            reviews: ReviewStore::new(db.clone()),
            favorites: FavoriteStore::new(db.clone()),
            messages: MessageStore::new(db.clone()),
            db,
        })
    }

    pub async fn seed(&self) -> Result<SeedOutcome> {
        seed_sample_data(self).await
    }

    /// A new auth manager with no session.
    pub fn auth_manager(&self) -> AuthManager {
        AuthManager::new(self.users.clone())
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn user_store(&self) -> &UserStore {
        &self.users
    }

    pub fn owner_profile_store(&self) -> &OwnerProfileStore {
        &self.owner_profiles
    }

    pub fn property_store(&self) -> &PropertyStore {
        &self.properties
    }

    pub fn media_store(&self) -> &MediaStore {
        &self.media
    }

    pub fn featured_store(&self) -> &FeaturedStore {
        &self.featured
    }

    pub fn pricing_store(&self) -> &PricingStore {
        &self.pricing
    }

    pub fn review_store(&self) -> &ReviewStore {
        &self.reviews
    }

    pub fn favorite_store(&self) -> &FavoriteStore {
        &self.favorites
    }

    pub fn message_store(&self) -> &MessageStore {
        &self.messages
    }

    pub async fn close(self) -> Result<()> {
        self.db.close().await?;
        Ok(())
    }
}

impl Backend for LocalStore {
    fn users(&self) -> &UserRepository {
        &self.users
    }

    fn owner_profiles(&self) -> &OwnerProfileRepository {
        &self.owner_profiles
    }

    fn properties(&self) -> &PropertyRepository {
        &self.properties
    }

    fn media(&self) -> &MediaRepository {
        &self.media
    }

    fn featured(&self) -> &FeaturedRepository {
        &self.featured
    }

    fn pricing(&self) -> &PricingRepository {
        &self.pricing
    }

    fn reviews(&self) -> &ReviewRepository {
        &self.reviews
    }

    fn favorites(&self) -> &FavoriteRepository {
        &self.favorites
    }

    fn messages(&self) -> &MessageRepository {
        &self.messages
    }
}
