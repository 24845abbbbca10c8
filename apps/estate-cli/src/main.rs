use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use estate_store::{
    Backend, FeatureType, LocalStore, OwnerSearch, PropertyFilter, PropertyType, Repository,
    SeedOutcome, StoreConfig,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect and seed the local estate database", long_about = None)]
struct Args {
    /// SQLite database file
    #[arg(long, env = "ESTATE_DB", default_value = "estate.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database file and schema
    Init {
        /// Also insert demo data
        #[arg(long)]
        seed: bool,
    },
    /// Insert demo data into an empty database
    Seed,
    /// List properties, newest first
    Properties {
        #[arg(long = "type")]
        property_type: Option<PropertyType>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        bedrooms: Option<u32>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        agent: Option<String>,
        #[arg(long)]
        premium: bool,
    },
    /// Live featured placements with their properties
    Featured {
        #[arg(long)]
        feature_type: Option<FeatureType>,
    },
    /// Mark paid placements whose end date has passed as expired
    Expire,
    /// Search owner profiles
    Owners {
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        specialty: Option<String>,
        #[arg(long)]
        min_rating: Option<f64>,
        #[arg(long)]
        verified: Option<bool>,
    },
    /// Inbox of a user
    Conversations { user_id: String },
    /// Properties a user has saved
    Favorites { user_id: String },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args = Args::parse();

    let store = LocalStore::open(StoreConfig {
        db_path: args.db.clone(),
        ..Default::default()
    })
    .await
    .with_context(|| format!("Failed to open database {}", args.db.display()))?;

    match args.command {
        Command::Init { seed } => {
            info!("Schema ready at {}", args.db.display());
            if seed {
                report_seed(store.seed().await.context("Failed to seed database")?);
            }
        }
        Command::Seed => {
            report_seed(store.seed().await.context("Failed to seed database")?);
        }
        Command::Properties {
            property_type,
            min_price,
            max_price,
            bedrooms,
            location,
            agent,
            premium,
        } => {
            let filter = PropertyFilter {
                property_type,
                min_price,
                max_price,
                bedrooms,
                location,
                agent_id: agent,
                premium_only: premium,
            };
            print_json(&store.properties().list(&filter).await?)?;
        }
        Command::Featured { feature_type } => {
            print_json(&store.featured_store().list_active(feature_type).await?)?;
        }
        Command::Expire => {
            let expired = store.featured_store().expire_lapsed().await?;
            info!("Expired {} lapsed placements", expired);
            print_json(&serde_json::json!({ "expired": expired }))?;
        }
        Command::Owners {
            location,
            specialty,
            min_rating,
            verified,
        } => {
            let search = OwnerSearch {
                location,
                specialty,
                min_rating,
                verified,
            };
            print_json(&store.owner_profiles().list(&search).await?)?;
        }
        Command::Conversations { user_id } => {
            print_json(&store.message_store().conversations(&user_id).await?)?;
        }
        Command::Favorites { user_id } => {
            print_json(&store.favorite_store().favorite_properties(&user_id).await?)?;
        }
    }

    store.close().await?;
    Ok(())
}

fn report_seed(outcome: SeedOutcome) {
    match outcome {
        SeedOutcome::Skipped => println!("Database already has data, nothing seeded"),
        SeedOutcome::Seeded { users, properties } => {
            println!("Seeded {users} users and {properties} properties")
        }
    }
}
