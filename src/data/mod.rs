//! Core data models for hullwatch
//!
//! This module contains the data types used throughout the application
//! for representing ship insurance valuations.

pub mod insurance;

pub use insurance::{InsuranceClient, InsuranceError, PriceSource};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single insurance coverage tier for a hull
///
/// Each hull can be insured at several levels (Basic through Platinum),
/// each with its own premium and insured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageTier {
    /// Name of the coverage level (e.g. "Basic", "Platinum")
    pub level: String,
    /// Premium paid for the policy, in ISK
    pub cost: f64,
    /// Amount paid out on hull loss, in ISK
    pub payout: f64,
}

impl CoverageTier {
    /// Payout per unit of premium, or `None` when the premium is zero
    pub fn payout_ratio(&self) -> Option<f64> {
        if self.cost > 0.0 {
            Some(self.payout / self.cost)
        } else {
            None
        }
    }
}

/// Insurance valuations for one insurable hull type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HullQuote {
    /// Display name of the hull
    pub hull_name: String,
    /// Available coverage tiers, sorted by ascending premium
    pub tiers: Vec<CoverageTier>,
}

impl HullQuote {
    /// Returns the tier with the highest payout, if any tiers exist
    pub fn best_tier(&self) -> Option<&CoverageTier> {
        self.tiers
            .iter()
            .max_by(|a, b| a.payout.partial_cmp(&b.payout).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Returns the cheapest tier, if any tiers exist
    pub fn cheapest_tier(&self) -> Option<&CoverageTier> {
        self.tiers.first()
    }
}

/// The full insurance price table: hull type id mapped to its quotes
///
/// This is the cached value the rest of the application revolves around.
/// A `BTreeMap` keeps iteration order stable across fetches so the UI
/// doesn't reshuffle on every refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsurancePrices {
    /// Quotes keyed by hull type id
    pub hulls: BTreeMap<u32, HullQuote>,
}

impl InsurancePrices {
    /// Number of hulls in the table
    pub fn len(&self) -> usize {
        self.hulls.len()
    }

    /// Whether the table contains no hulls
    pub fn is_empty(&self) -> bool {
        self.hulls.is_empty()
    }

    /// Looks up the quote for a hull type id
    pub fn get(&self, type_id: u32) -> Option<&HullQuote> {
        self.hulls.get(&type_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_quote() -> HullQuote {
        HullQuote {
            hull_name: "Bantam".to_string(),
            tiers: vec![
                CoverageTier {
                    level: "Basic".to_string(),
                    cost: 12_000.0,
                    payout: 40_000.0,
                },
                CoverageTier {
                    level: "Platinum".to_string(),
                    cost: 120_000.0,
                    payout: 400_000.0,
                },
            ],
        }
    }

    #[test]
    fn test_payout_ratio() {
        let tier = CoverageTier {
            level: "Basic".to_string(),
            cost: 10_000.0,
            payout: 35_000.0,
        };
        assert!((tier.payout_ratio().unwrap() - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_payout_ratio_zero_cost_is_none() {
        let tier = CoverageTier {
            level: "Free".to_string(),
            cost: 0.0,
            payout: 35_000.0,
        };
        assert!(tier.payout_ratio().is_none());
    }

    #[test]
    fn test_best_tier_picks_highest_payout() {
        let quote = sample_quote();
        assert_eq!(quote.best_tier().unwrap().level, "Platinum");
    }

    #[test]
    fn test_cheapest_tier_is_first() {
        let quote = sample_quote();
        assert_eq!(quote.cheapest_tier().unwrap().level, "Basic");
    }

    #[test]
    fn test_tiers_empty_has_no_best() {
        let quote = HullQuote {
            hull_name: "Capsule".to_string(),
            tiers: Vec::new(),
        };
        assert!(quote.best_tier().is_none());
        assert!(quote.cheapest_tier().is_none());
    }

    #[test]
    fn test_prices_lookup() {
        let mut prices = InsurancePrices::default();
        assert!(prices.is_empty());

        prices.hulls.insert(582, sample_quote());
        assert_eq!(prices.len(), 1);
        assert_eq!(prices.get(582).unwrap().hull_name, "Bantam");
        assert!(prices.get(583).is_none());
    }

    #[test]
    fn test_prices_serialization_roundtrip() {
        let mut prices = InsurancePrices::default();
        prices.hulls.insert(582, sample_quote());

        let json = serde_json::to_string(&prices).expect("Failed to serialize InsurancePrices");
        let deserialized: InsurancePrices =
            serde_json::from_str(&json).expect("Failed to deserialize InsurancePrices");

        assert_eq!(deserialized, prices);
    }

    #[test]
    fn test_iteration_order_is_sorted_by_type_id() {
        let mut prices = InsurancePrices::default();
        prices.hulls.insert(603, sample_quote());
        prices.hulls.insert(582, sample_quote());
        prices.hulls.insert(598, sample_quote());

        let ids: Vec<u32> = prices.hulls.keys().copied().collect();
        assert_eq!(ids, vec![582, 598, 603]);
    }
}
