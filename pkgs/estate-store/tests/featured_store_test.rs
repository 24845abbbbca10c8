// Copyright 2024 Gigi Team.
//
// Tests for FeaturedStore: the active-placement rule and expiry

mod common;

use chrono::{Duration, Utc};
use common::{create_property, create_user, open_store};
use estate_store::{
    FeatureType, FeaturedFilter, FeaturedPropertyPatch, NewFeaturedProperty, PaymentStatus,
    PropertyType, Repository,
};
use tempfile::NamedTempFile;

fn placement(
    property_id: &str,
    owner_id: &str,
    status: PaymentStatus,
    days_left: Option<i64>,
    priority: i32,
) -> NewFeaturedProperty {
    NewFeaturedProperty {
        property_id: property_id.to_string(),
        owner_id: owner_id.to_string(),
        feature_type: FeatureType::HomepageHero,
        start_date: Some(Utc::now() - Duration::days(10)),
        end_date: days_left.map(|d| Utc::now() + Duration::days(d)),
        priority,
        payment_amount: Some(99.0),
        payment_status: status,
    }
}

#[tokio::test]
async fn test_only_paid_unexpired_placements_are_active() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let owner = create_user(&store, "owner@example.com").await;
    let property = create_property(&store, &owner.id, "Villa", PropertyType::Sale, 1e6).await;
    let featured = store.featured_store();

    let open_ended = featured
        .create(placement(&property.id, &owner.id, PaymentStatus::Paid, None, 1))
        .await
        .unwrap();
    let running = featured
        .create(placement(&property.id, &owner.id, PaymentStatus::Paid, Some(5), 3))
        .await
        .unwrap();
    featured
        .create(placement(&property.id, &owner.id, PaymentStatus::Paid, Some(-1), 9))
        .await
        .unwrap();
    featured
        .create(placement(&property.id, &owner.id, PaymentStatus::Pending, Some(5), 9))
        .await
        .unwrap();
    featured
        .create(placement(&property.id, &owner.id, PaymentStatus::Expired, None, 9))
        .await
        .unwrap();

    let active = featured.list_active(None).await.unwrap();
    let ids: Vec<&str> = active.iter().map(|l| l.featured.id.as_str()).collect();
    // Highest priority first
    assert_eq!(ids, vec![running.id.as_str(), open_ended.id.as_str()]);
    assert!(active.iter().all(|l| l.property.id == property.id));
    assert!(active.iter().all(|l| l.featured.is_active_at(Utc::now())));

    let filtered = featured
        .list(&FeaturedFilter {
            active_only: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(filtered.len(), 2);

    let all = featured.list(&FeaturedFilter::default()).await.unwrap();
    assert_eq!(all.len(), 5);
}

#[tokio::test]
async fn test_filter_by_feature_type() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let owner = create_user(&store, "owner@example.com").await;
    let property = create_property(&store, &owner.id, "Loft", PropertyType::Rent, 2000.0).await;

    store
        .featured_store()
        .create(placement(&property.id, &owner.id, PaymentStatus::Paid, None, 0))
        .await
        .unwrap();
    let mut sponsored = placement(&property.id, &owner.id, PaymentStatus::Paid, None, 0);
    sponsored.feature_type = FeatureType::Sponsored;
    let sponsored = store.featured_store().create(sponsored).await.unwrap();

    let active = store
        .featured_store()
        .list_active(Some(FeatureType::Sponsored))
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].featured, sponsored);
}

#[tokio::test]
async fn test_expire_lapsed() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let owner = create_user(&store, "owner@example.com").await;
    let property = create_property(&store, &owner.id, "Cabin", PropertyType::Sale, 1e5).await;

    let lapsed = store
        .featured_store()
        .create(placement(&property.id, &owner.id, PaymentStatus::Paid, Some(-2), 0))
        .await
        .unwrap();
    let running = store
        .featured_store()
        .create(placement(&property.id, &owner.id, PaymentStatus::Paid, Some(2), 0))
        .await
        .unwrap();

    assert_eq!(store.featured_store().expire_lapsed().await.unwrap(), 1);
    assert_eq!(store.featured_store().expire_lapsed().await.unwrap(), 0);

    let lapsed = store.featured_store().get(&lapsed.id).await.unwrap().unwrap();
    assert_eq!(lapsed.payment_status, PaymentStatus::Expired);
    let running = store.featured_store().get(&running.id).await.unwrap().unwrap();
    assert_eq!(running.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn test_payment_confirmation_activates() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let owner = create_user(&store, "owner@example.com").await;
    let property = create_property(&store, &owner.id, "Barn", PropertyType::Sale, 1e5).await;

    let pending = store
        .featured_store()
        .create(placement(&property.id, &owner.id, PaymentStatus::Pending, Some(30), 0))
        .await
        .unwrap();
    assert!(store.featured_store().list_active(None).await.unwrap().is_empty());

    let paid = store
        .featured_store()
        .update(
            &pending.id,
            FeaturedPropertyPatch {
                payment_status: Some(PaymentStatus::Paid),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(paid.end_date, pending.end_date);
    assert_eq!(store.featured_store().list_active(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_clearing_end_date_reopens_placement() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let owner = create_user(&store, "owner@example.com").await;
    let property = create_property(&store, &owner.id, "Chalet", PropertyType::Sale, 4e5).await;

    let lapsed = store
        .featured_store()
        .create(placement(&property.id, &owner.id, PaymentStatus::Paid, Some(-1), 0))
        .await
        .unwrap();
    assert!(store.featured_store().list_active(None).await.unwrap().is_empty());

    let reopened = store
        .featured_store()
        .update(
            &lapsed.id,
            FeaturedPropertyPatch {
                end_date: Some(None),
                payment_amount: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reopened.end_date, None);
    assert_eq!(reopened.payment_amount, None);
    assert_eq!(reopened.start_date, lapsed.start_date);

    let active = store.featured_store().list_active(None).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].featured, reopened);
}
