// Copyright 2024 Gigi Team.
//
// Tests for PricingStore

mod common;

use common::{create_property, create_user, open_store};
use estate_store::{
    NewPropertyPricing, PricingPatch, PricingType, PropertyType, Repository, SpecialOffer,
};
use tempfile::NamedTempFile;

#[tokio::test]
async fn test_price_history_appends() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let agent = create_user(&store, "agent@example.com").await;
    let property = create_property(&store, &agent.id, "Loft", PropertyType::Rent, 2400.0).await;

    let pricing = store
        .pricing_store()
        .create(NewPropertyPricing {
            property_id: property.id.clone(),
            pricing_type: PricingType::Rent,
            base_price: 2400.0,
            currency: "USD".into(),
            price_per: Some("month".into()),
            negotiable: false,
            special_offers: SpecialOffer::default(),
        })
        .await
        .unwrap();
    assert!(pricing.price_history.is_empty());

    store
        .pricing_store()
        .record_price_change(&pricing.id, 2300.0, Some("Slow season".into()))
        .await
        .unwrap()
        .unwrap();
    let latest = store
        .pricing_store()
        .record_price_change(&pricing.id, 2200.0, None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(latest.base_price, 2200.0);
    let prices: Vec<f64> = latest.price_history.iter().map(|c| c.price).collect();
    assert_eq!(prices, vec![2300.0, 2200.0]);
    assert_eq!(latest.price_history[0].reason.as_deref(), Some("Slow season"));

    let current = store
        .pricing_store()
        .get_for_property(&property.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current, latest);

    assert!(store
        .pricing_store()
        .record_price_change("missing", 1.0, None)
        .await
        .unwrap()
        .is_none());
    assert!(store
        .pricing_store()
        .record_price_change(&pricing.id, -5.0, None)
        .await
        .is_err());
}

#[tokio::test]
async fn test_patch_keeps_history() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let agent = create_user(&store, "agent@example.com").await;
    let property = create_property(&store, &agent.id, "House", PropertyType::Sale, 5e5).await;

    let pricing = store
        .pricing_store()
        .create(NewPropertyPricing {
            property_id: property.id.clone(),
            pricing_type: PricingType::Sale,
            base_price: 5e5,
            currency: "USD".into(),
            price_per: None,
            negotiable: false,
            special_offers: SpecialOffer::default(),
        })
        .await
        .unwrap();
    store
        .pricing_store()
        .record_price_change(&pricing.id, 4.8e5, None)
        .await
        .unwrap();

    let updated = store
        .pricing_store()
        .update(
            &pricing.id,
            PricingPatch {
                pricing_type: Some(PricingType::Auction),
                negotiable: Some(true),
                special_offers: Some(SpecialOffer {
                    discount: Some(5.0),
                    valid_until: None,
                    description: Some("Closing costs covered".into()),
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.pricing_type, PricingType::Auction);
    assert!(updated.negotiable);
    assert_eq!(updated.special_offers.discount, Some(5.0));
    assert_eq!(updated.base_price, 4.8e5);
    assert_eq!(updated.price_history.len(), 1);
}
