// Copyright 2024 Gigi Team.
//
// Shared fixtures for estate-store integration tests

#![allow(dead_code)]

use estate_store::{
    LocalStore, NewProperty, NewUser, Property, PropertyType, Repository, StoreConfig, User,
};
use tempfile::NamedTempFile;

pub async fn open_store(path: &NamedTempFile) -> LocalStore {
    LocalStore::open(StoreConfig {
        db_path: path.path().to_path_buf(),
        ..Default::default()
    })
    .await
    .expect("Failed to open store")
}

pub async fn create_user(store: &LocalStore, email: &str) -> User {
    store
        .user_store()
        .create(NewUser {
            email: email.to_string(),
            full_name: Some(email.split('@').next().unwrap().to_string()),
            is_owner: true,
            ..Default::default()
        })
        .await
        .expect("Failed to create user")
}

pub fn listing(agent_id: &str, title: &str, property_type: PropertyType, price: f64) -> NewProperty {
    NewProperty {
        title: title.to_string(),
        description: format!("{title} description"),
        price,
        property_type,
        bedrooms: 2,
        bathrooms: 1.0,
        area: 900.0,
        location: "Austin, TX".to_string(),
        images: vec!["https://img.example/1.jpg".to_string()],
        features: Default::default(),
        agent_id: agent_id.to_string(),
        is_premium_listing: false,
    }
}

pub async fn create_property(
    store: &LocalStore,
    agent_id: &str,
    title: &str,
    property_type: PropertyType,
    price: f64,
) -> Property {
    store
        .property_store()
        .create(listing(agent_id, title, property_type, price))
        .await
        .expect("Failed to create property")
}
