//! Closed value domains stored as text columns.
//!
//! Each enum renders to the exact string the schema's CHECK constraint
//! accepts, and parsing anything else fails with `StoreError::InvalidValue`
//! before a write is attempted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Storage representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(StoreError::invalid($field, other)),
                }
            }
        }
    };
}

text_enum! {
    /// Whether a listing is for sale or for rent
    PropertyType, "type" {
        Sale => "sale",
        Rent => "rent",
    }
}

text_enum! {
    /// Kind of media attached to a property
    MediaType, "media_type" {
        Image => "image",
        Video => "video",
        VirtualTour => "virtual_tour",
    }
}

text_enum! {
    /// Placement bought for a featured property
    FeatureType, "feature_type" {
        HomepageHero => "homepage_hero",
        PremiumListing => "premium_listing",
        Sponsored => "sponsored",
    }
}

text_enum! {
    PaymentStatus, "payment_status" {
        Pending => "pending",
        Paid => "paid",
        Expired => "expired",
    }
}

text_enum! {
    PricingType, "pricing_type" {
        Sale => "sale",
        Rent => "rent",
        Lease => "lease",
        Auction => "auction",
    }
}

text_enum! {
    /// Owner subscription plan
    SubscriptionTier, "subscription_tier" {
        Basic => "basic",
        Premium => "premium",
        Professional => "professional",
    }
}

impl Default for SubscriptionTier {
    fn default() -> Self {
        SubscriptionTier::Basic
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_strings_parse_back() {
        for value in FeatureType::ALL {
            assert_eq!(value.as_str().parse::<FeatureType>().unwrap(), *value);
        }
        for value in MediaType::ALL {
            assert_eq!(value.as_str().parse::<MediaType>().unwrap(), *value);
        }
    }

    #[test]
    fn test_unknown_value_rejected() {
        let err = "lease".parse::<PropertyType>().unwrap_err();
        match err {
            StoreError::InvalidValue { field, value } => {
                assert_eq!(field, "type");
                assert_eq!(value, "lease");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!("Sale".parse::<PropertyType>().is_err());
    }

    #[test]
    fn test_serde_uses_storage_strings() {
        let json = serde_json::to_string(&MediaType::VirtualTour).unwrap();
        assert_eq!(json, "\"virtual_tour\"");
        let tier: SubscriptionTier = serde_json::from_str("\"professional\"").unwrap();
        assert_eq!(tier, SubscriptionTier::Professional);
    }
}
