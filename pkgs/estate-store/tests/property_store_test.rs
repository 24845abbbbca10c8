// Copyright 2024 Gigi Team.
//
// Tests for PropertyStore: filtering, partial updates and cascades

mod common;

use common::{create_property, create_user, listing, open_store};
use estate_store::{
    Backend, FeatureType, NewFeaturedProperty, NewPropertyMedia, NewPropertyPricing, MediaType,
    PaymentStatus, PricingType, PropertyFilter, PropertyPatch, PropertyType, Repository,
    StoreError,
};
use tempfile::NamedTempFile;

#[tokio::test]
async fn test_round_trip_through_storage() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let agent = create_user(&store, "agent@example.com").await;

    let mut draft = listing(&agent.id, "Lake House", PropertyType::Sale, 450_000.0);
    draft.images = vec!["https://img.example/b.jpg".into(), "https://img.example/a.jpg".into()];
    draft.features = vec!["Fireplace".into(), "Dock".into(), "Fireplace".into()];
    draft.bathrooms = 2.5;
    draft.is_premium_listing = true;

    let created = store.property_store().create(draft).await.unwrap();
    let fetched = store.property_store().get(&created.id).await.unwrap().unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.images[0], "https://img.example/b.jpg");
    assert_eq!(fetched.features, vec!["Fireplace", "Dock"]);
    assert_eq!(fetched.bathrooms, 2.5);
    assert!(fetched.is_premium_listing);
}

#[tokio::test]
async fn test_filter_conjunction_newest_first() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let agent = create_user(&store, "agent@example.com").await;

    let cheap_rent = create_property(&store, &agent.id, "Studio", PropertyType::Rent, 900.0).await;
    let rent_a = create_property(&store, &agent.id, "Loft", PropertyType::Rent, 1500.0).await;
    let sale = create_property(&store, &agent.id, "House", PropertyType::Sale, 2000.0).await;
    let rent_b = create_property(&store, &agent.id, "Flat", PropertyType::Rent, 3000.0).await;
    let pricey_rent =
        create_property(&store, &agent.id, "Penthouse", PropertyType::Rent, 3500.0).await;

    let results = store
        .properties()
        .list(&PropertyFilter {
            property_type: Some(PropertyType::Rent),
            min_price: Some(1000.0),
            max_price: Some(3000.0),
            ..Default::default()
        })
        .await
        .unwrap();

    let ids: Vec<&str> = results.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec![rent_b.id.as_str(), rent_a.id.as_str()]);
    for excluded in [&cheap_rent, &sale, &pricey_rent] {
        assert!(!ids.contains(&excluded.id.as_str()));
    }
}

#[tokio::test]
async fn test_location_bedrooms_and_agent_filters() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let alice = create_user(&store, "alice@example.com").await;
    let bob = create_user(&store, "bob@example.com").await;

    let mut miami = listing(&alice.id, "Condo", PropertyType::Sale, 300_000.0);
    miami.location = "Miami Beach, FL".into();
    miami.bedrooms = 3;
    let miami = store.property_store().create(miami).await.unwrap();
    create_property(&store, &alice.id, "Austin Flat", PropertyType::Rent, 1800.0).await;
    create_property(&store, &bob.id, "Austin Loft", PropertyType::Rent, 2200.0).await;

    let by_location = store
        .property_store()
        .list(&PropertyFilter {
            location: Some("miami".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_location.len(), 1);
    assert_eq!(by_location[0].id, miami.id);

    let three_bed = store
        .property_store()
        .list(&PropertyFilter {
            bedrooms: Some(3),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(three_bed.len(), 1);

    let alices = store.property_store().list_by_agent(&alice.id).await.unwrap();
    assert_eq!(alices.len(), 2);
    assert!(alices.iter().all(|p| p.agent_id == alice.id));
}

#[tokio::test]
async fn test_location_filter_non_ascii_and_wildcards() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let agent = create_user(&store, "agent@example.com").await;

    let mut paris = listing(&agent.id, "Pied-à-terre", PropertyType::Rent, 3000.0);
    paris.location = "ÎLE-DE-FRANCE".into();
    let paris = store.property_store().create(paris).await.unwrap();
    let mut discount = listing(&agent.id, "Outlet Unit", PropertyType::Rent, 900.0);
    discount.location = "Unit 50% Plaza".into();
    let discount = store.property_store().create(discount).await.unwrap();
    create_property(&store, &agent.id, "Austin Flat", PropertyType::Rent, 1800.0).await;

    for query in ["île-de-france", "ÎLE", "de-fr"] {
        let found = store
            .property_store()
            .list(&PropertyFilter {
                location: Some(query.into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![paris.id.as_str()], "query {query:?}");
    }

    // Wildcard characters match themselves
    let literal = store
        .property_store()
        .list(&PropertyFilter {
            location: Some("50%".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(literal, vec![discount]);

    let underscore = store
        .property_store()
        .list(&PropertyFilter {
            location: Some("a_s".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(underscore.is_empty());
}

#[tokio::test]
async fn test_update_price_only() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let agent = create_user(&store, "agent@example.com").await;
    let property = create_property(&store, &agent.id, "Cabin", PropertyType::Sale, 100_000.0).await;

    let updated = store
        .property_store()
        .update(
            &property.id,
            PropertyPatch {
                price: Some(95_000.0),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.price, 95_000.0);
    assert_eq!(updated.title, property.title);
    assert_eq!(updated.images, property.images);
    assert_eq!(updated.property_type, property.property_type);
    assert_eq!(updated.created_at, property.created_at);
    assert!(updated.updated_at >= property.updated_at);
}

#[tokio::test]
async fn test_invalid_values_rejected_before_write() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let agent = create_user(&store, "agent@example.com").await;
    let property = create_property(&store, &agent.id, "Barn", PropertyType::Sale, 50_000.0).await;

    let err = store
        .property_store()
        .update(
            &property.id,
            PropertyPatch {
                price: Some(-1.0),
                title: Some("Changed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidValue { field: "price", .. }));

    let stored = store.property_store().get(&property.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Barn");

    let err = store
        .property_store()
        .create(listing(&agent.id, "Bad", PropertyType::Sale, f64::NAN))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidValue { .. }));
}

#[tokio::test]
async fn test_unknown_agent_is_missing_reference() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;

    let err = store
        .property_store()
        .create(listing("ghost", "Nowhere", PropertyType::Rent, 100.0))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingReference(_)), "got {err}");
}

#[tokio::test]
async fn test_delete_cascades_to_dependents() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let agent = create_user(&store, "agent@example.com").await;
    let property = create_property(&store, &agent.id, "Villa", PropertyType::Sale, 900_000.0).await;

    let media = store
        .media_store()
        .create(NewPropertyMedia {
            property_id: property.id.clone(),
            media_type: MediaType::Image,
            media_url: "https://img.example/villa.jpg".into(),
            thumbnail_url: None,
            title: None,
            description: None,
            display_order: 0,
            is_primary: true,
        })
        .await
        .unwrap();
    let pricing = store
        .pricing_store()
        .create(NewPropertyPricing {
            property_id: property.id.clone(),
            pricing_type: PricingType::Sale,
            base_price: 900_000.0,
            currency: "USD".into(),
            price_per: None,
            negotiable: true,
            special_offers: Default::default(),
        })
        .await
        .unwrap();
    let featured = store
        .featured_store()
        .create(NewFeaturedProperty {
            property_id: property.id.clone(),
            owner_id: agent.id.clone(),
            feature_type: FeatureType::Sponsored,
            start_date: None,
            end_date: None,
            priority: 1,
            payment_amount: Some(20.0),
            payment_status: PaymentStatus::Paid,
        })
        .await
        .unwrap();
    let favorite = store
        .favorite_store()
        .add(&agent.id, &property.id)
        .await
        .unwrap();

    assert!(store.properties().delete(&property.id).await.unwrap());

    assert!(store.properties().get(&property.id).await.unwrap().is_none());
    assert!(store.media().get(&media.id).await.unwrap().is_none());
    assert!(store.pricing().get(&pricing.id).await.unwrap().is_none());
    assert!(store.featured().get(&featured.id).await.unwrap().is_none());
    assert!(store.favorites().get(&favorite.id).await.unwrap().is_none());
    // The listing user is untouched
    assert!(store.users().get(&agent.id).await.unwrap().is_some());
}
