//! Demo data for a fresh database

use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::auth_manager::password_digest;
use crate::enums::{PropertyType, SubscriptionTier};
use crate::error::Result;
use crate::owner_store::NewOwnerProfile;
use crate::property_store::NewProperty;
use crate::repository::Repository;
use crate::user_store::NewUser;
use crate::LocalStore;

/// Password of every demo account.
pub const DEMO_PASSWORD: &str = "password123";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SeedOutcome {
    /// The database already had users; nothing was written.
    Skipped,
    Seeded { users: usize, properties: usize },
}

struct DemoUser {
    email: &'static str,
    full_name: &'static str,
    avatar_url: &'static str,
    phone: &'static str,
    bio: &'static str,
}

const DEMO_USERS: [DemoUser; 2] = [
    DemoUser {
        email: "john.doe@example.com",
        full_name: "John Doe",
        avatar_url: "https://images.pexels.com/photos/614810/pexels-photo-614810.jpeg",
        phone: "+1234567890",
        bio: "Experienced real estate professional",
    },
    DemoUser {
        email: "sarah.wilson@example.com",
        full_name: "Sarah Wilson",
        avatar_url: "https://images.pexels.com/photos/774909/pexels-photo-774909.jpeg",
        phone: "+1234567891",
        bio: "Luxury property specialist",
    },
];

fn demo_properties(john: &str, sarah: &str) -> Vec<NewProperty> {
    vec![
        NewProperty {
            title: "Luxury Villa with Ocean View".into(),
            description: "This stunning oceanfront villa offers breathtaking views and luxurious living spaces.".into(),
            price: 1_200_000.0,
            property_type: PropertyType::Sale,
            bedrooms: 4,
            bathrooms: 3.5,
            area: 3500.0,
            location: "Miami Beach, FL".into(),
            images: vec![
                "https://images.pexels.com/photos/1396122/pexels-photo-1396122.jpeg".into(),
            ],
            features: ["Ocean View", "Private Pool", "Gourmet Kitchen"]
                .into_iter()
                .map(String::from)
                .collect(),
            agent_id: john.to_string(),
            is_premium_listing: true,
        },
        NewProperty {
            title: "Modern Downtown Apartment".into(),
            description: "Contemporary apartment in the heart of the city with all modern amenities.".into(),
            price: 2500.0,
            property_type: PropertyType::Rent,
            bedrooms: 2,
            bathrooms: 2.0,
            area: 1200.0,
            location: "New York, NY".into(),
            images: vec![
                "https://images.pexels.com/photos/1571460/pexels-photo-1571460.jpeg".into(),
            ],
            features: ["City View", "Modern Kitchen", "Gym Access"]
                .into_iter()
                .map(String::from)
                .collect(),
            agent_id: sarah.to_string(),
            is_premium_listing: true,
        },
    ]
}

/// Populate an empty database with two demo owners and two listings.
///
/// Does nothing when any user exists. The check and the inserts are not
/// one transaction, so two processes seeding the same new file at once may
/// both try; the unique email index makes the loser fail with a conflict.
pub async fn seed_sample_data(store: &LocalStore) -> Result<SeedOutcome> {
    if store.user_store().count().await? > 0 {
        info!("Database already has users, skipping sample data");
        return Ok(SeedOutcome::Skipped);
    }

    let mut user_ids = Vec::with_capacity(DEMO_USERS.len());
    for demo in &DEMO_USERS {
        let draft = NewUser {
            email: demo.email.to_string(),
            full_name: Some(demo.full_name.to_string()),
            avatar_url: Some(demo.avatar_url.to_string()),
            phone: Some(demo.phone.to_string()),
            bio: Some(demo.bio.to_string()),
            is_agent: true,
            is_owner: true,
        };
        let user = store
            .user_store()
            .create_with_password(draft, password_digest(demo.email, DEMO_PASSWORD))
            .await?;

        let (years_experience, subscription_tier) = {
            let mut rng = rand::thread_rng();
            let tier = if rng.gen_bool(0.5) {
                SubscriptionTier::Premium
            } else {
                SubscriptionTier::Basic
            };
            (rng.gen_range(5..20), tier)
        };
        store
            .owner_profile_store()
            .create(NewOwnerProfile {
                user_id: user.id.clone(),
                business_name: Some(format!("{} Real Estate", demo.full_name)),
                business_description: Some(
                    "Professional real estate services with years of experience".into(),
                ),
                years_experience,
                subscription_tier,
                ..Default::default()
            })
            .await?;

        user_ids.push(user.id);
    }

    let properties = demo_properties(&user_ids[0], &user_ids[1]);
    let property_count = properties.len();
    for property in properties {
        store.property_store().create(property).await?;
    }
    for user_id in &user_ids {
        store.owner_profile_store().refresh_stats(user_id).await?;
    }

    info!(
        "Inserted sample data: {} users, {} properties",
        user_ids.len(),
        property_count
    );
    Ok(SeedOutcome::Seeded {
        users: user_ids.len(),
        properties: property_count,
    })
}
