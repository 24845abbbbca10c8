// Copyright 2024 Gigi Team.
//
// Tests for UserStore

mod common;

use common::{create_property, create_user, open_store};
use estate_store::{
    FavoriteFilter, FeatureType, FeaturedFilter, MessageFilter, NewFeaturedProperty,
    NewOwnerProfile, NewOwnerReview, NewUser, PaymentStatus, PropertyFilter, PropertyType,
    Repository, ReviewFilter, StoreError, UserFilter, UserPatch,
};
use tempfile::NamedTempFile;

#[tokio::test]
async fn test_create_and_get_user() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;

    let created = store
        .user_store()
        .create(NewUser {
            email: "ana@example.com".into(),
            full_name: Some("Ana".into()),
            phone: Some("+15550100".into()),
            is_agent: true,
            ..Default::default()
        })
        .await
        .expect("Failed to create user");

    assert_eq!(created.id.len(), 36);
    assert!(created.is_agent);
    assert!(!created.is_owner);
    assert_eq!(created.created_at, created.updated_at);

    let fetched = store
        .user_store()
        .get(&created.id)
        .await
        .expect("Failed to get user")
        .expect("User not found");
    assert_eq!(fetched, created);

    let by_email = store
        .user_store()
        .get_by_email("ana@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, created.id);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;

    create_user(&store, "dup@example.com").await;
    let err = store
        .user_store()
        .create(NewUser {
            email: "dup@example.com".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(err.is_conflict(), "expected conflict, got {err}");
    assert_eq!(store.user_store().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_invalid_email_rejected() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;

    let err = store
        .user_store()
        .create(NewUser {
            email: "   ".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidValue { field: "email", .. }));
}

#[tokio::test]
async fn test_partial_update() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let user = create_user(&store, "bo@example.com").await;

    let updated = store
        .user_store()
        .update(
            &user.id,
            UserPatch {
                bio: Some(Some("Condo specialist".into())),
                is_agent: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.bio.as_deref(), Some("Condo specialist"));
    assert!(updated.is_agent);
    assert_eq!(updated.full_name, user.full_name);
    assert_eq!(updated.email, user.email);
    assert_eq!(updated.created_at, user.created_at);
    assert!(updated.updated_at >= user.updated_at);
}

#[tokio::test]
async fn test_patch_clears_nullable_fields() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let user = store
        .user_store()
        .create(NewUser {
            email: "di@example.com".into(),
            full_name: Some("Di".into()),
            avatar_url: Some("https://img.example/di.jpg".into()),
            phone: Some("+15550199".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let cleared = store
        .user_store()
        .update(
            &user.id,
            UserPatch {
                avatar_url: Some(None),
                phone: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(cleared.avatar_url, None);
    assert_eq!(cleared.phone, None);
    assert_eq!(cleared.full_name.as_deref(), Some("Di"));

    let fetched = store.user_store().get(&user.id).await.unwrap().unwrap();
    assert_eq!(fetched, cleared);
}

#[tokio::test]
async fn test_empty_patch_changes_nothing() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let user = create_user(&store, "cy@example.com").await;

    let unchanged = store
        .user_store()
        .update(&user.id, UserPatch::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged, user);
}

#[tokio::test]
async fn test_unknown_id_is_not_an_error() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;

    assert!(store.user_store().get("nope").await.unwrap().is_none());
    assert!(store
        .user_store()
        .update("nope", UserPatch::default())
        .await
        .unwrap()
        .is_none());
    assert!(!store.user_store().delete("nope").await.unwrap());
}

#[tokio::test]
async fn test_list_filters_and_newest_first() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;

    let first = create_user(&store, "first@example.com").await;
    let second = create_user(&store, "second@example.com").await;
    store
        .user_store()
        .create(NewUser {
            email: "agent@example.com".into(),
            is_agent: true,
            ..Default::default()
        })
        .await
        .unwrap();

    let owners = store
        .user_store()
        .list(&UserFilter {
            is_owner: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    let ids: Vec<&str> = owners.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);

    let all = store.user_store().list(&UserFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].email, "agent@example.com");
}

#[tokio::test]
async fn test_password_hash_not_serialized() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let user = create_user(&store, "json@example.com").await;

    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["email"], "json@example.com");
    assert_eq!(json["isOwner"], true);
    assert!(json.get("passwordHash").is_none());
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn test_delete_user_cascades() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let owner = create_user(&store, "owner@example.com").await;
    let buyer = create_user(&store, "buyer@example.com").await;

    let listing = create_property(&store, &owner.id, "Townhouse", PropertyType::Sale, 3e5).await;
    let kept = create_property(&store, &buyer.id, "Studio", PropertyType::Rent, 1200.0).await;
    store
        .owner_profile_store()
        .create(NewOwnerProfile {
            user_id: owner.id.clone(),
            ..Default::default()
        })
        .await
        .unwrap();
    store
        .featured_store()
        .create(NewFeaturedProperty {
            property_id: listing.id.clone(),
            owner_id: owner.id.clone(),
            feature_type: FeatureType::Sponsored,
            start_date: None,
            end_date: None,
            priority: 0,
            payment_amount: None,
            payment_status: PaymentStatus::Paid,
        })
        .await
        .unwrap();
    store
        .review_store()
        .create(NewOwnerReview {
            owner_id: owner.id.clone(),
            reviewer_id: buyer.id.clone(),
            property_id: None,
            rating: 5,
            review_text: None,
        })
        .await
        .unwrap();
    store.favorite_store().add(&buyer.id, &listing.id).await.unwrap();
    store.favorite_store().add(&owner.id, &kept.id).await.unwrap();
    store
        .message_store()
        .send(&buyer.id, &owner.id, "Still for sale?", None)
        .await
        .unwrap();

    assert!(store.user_store().delete(&owner.id).await.unwrap());

    let properties = store
        .property_store()
        .list(&PropertyFilter::default())
        .await
        .unwrap();
    assert_eq!(properties, vec![kept.clone()]);
    assert!(store
        .owner_profile_store()
        .get_by_user(&owner.id)
        .await
        .unwrap()
        .is_none());
    assert!(store
        .featured_store()
        .list(&FeaturedFilter::default())
        .await
        .unwrap()
        .is_empty());
    assert!(store
        .review_store()
        .list(&ReviewFilter::default())
        .await
        .unwrap()
        .is_empty());
    assert!(store
        .favorite_store()
        .list(&FavoriteFilter::default())
        .await
        .unwrap()
        .is_empty());
    assert!(store
        .message_store()
        .list(&MessageFilter::default())
        .await
        .unwrap()
        .is_empty());

    // The other party survives
    assert_eq!(store.user_store().count().await.unwrap(), 1);
    assert!(store.user_store().get(&buyer.id).await.unwrap().is_some());
}
