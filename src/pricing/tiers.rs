use std::collections::HashMap;

use tracing::info;

use crate::consts::STANDARD_TIER;
use crate::error::CatalogError;

use super::defaults::{default_tiers, standard_tier};
use super::types::ServiceTierMultiplier;

/// Service-tier multipliers with an always-present `"standard"` tier at 1.0
#[derive(Debug, Clone)]
pub struct TierCatalog {
    tiers: HashMap<String, ServiceTierMultiplier>,
    standard: ServiceTierMultiplier,
}

impl Default for TierCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl TierCatalog {
    pub fn with_defaults() -> Self {
        Self {
            tiers: default_tiers()
                .into_iter()
                .map(|t| (t.tier_name.clone(), t))
                .collect(),
            standard: standard_tier(),
        }
    }

    /// Tier entry for `tier`; absent, empty and unrecognised names resolve to standard.
    pub fn get(&self, tier: Option<&str>) -> &ServiceTierMultiplier {
        match tier {
            Some(name) if !name.is_empty() && name != STANDARD_TIER => {
                self.tiers.get(name).unwrap_or(&self.standard)
            }
            _ => &self.standard,
        }
    }

    pub fn multiplier(&self, tier: Option<&str>) -> f64 {
        self.get(tier).multiplier
    }

    /// Add or replace a tier.
    pub fn insert(&mut self, name: &str, tier: ServiceTierMultiplier) -> Result<(), CatalogError> {
        if !tier.multiplier.is_finite() || tier.multiplier <= 0.0 {
            return Err(CatalogError::InvalidMultiplier {
                tier: name.to_string(),
                multiplier: tier.multiplier,
            });
        }
        if name == STANDARD_TIER {
            if tier.multiplier != 1.0 {
                return Err(CatalogError::StandardTierChanged {
                    multiplier: tier.multiplier,
                });
            }
            self.standard = tier;
        } else {
            self.tiers.insert(name.to_string(), tier);
        }
        info!(tier = name, "Added service tier");
        Ok(())
    }

    /// All tiers sorted by name, standard included
    pub fn entries(&self) -> Vec<(&str, &ServiceTierMultiplier)> {
        let mut entries: Vec<(&str, &ServiceTierMultiplier)> = self
            .tiers
            .iter()
            .map(|(name, tier)| (name.as_str(), tier))
            .chain(std::iter::once((STANDARD_TIER, &self.standard)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_multipliers() {
        let tiers = TierCatalog::default();
        assert_eq!(tiers.multiplier(Some("standard")), 1.0);
        assert_eq!(tiers.multiplier(Some("flex")), 0.7);
        assert_eq!(tiers.multiplier(Some("premium")), 1.5);
    }

    #[test]
    fn missing_or_empty_tier_is_standard() {
        let tiers = TierCatalog::default();
        assert_eq!(tiers.multiplier(None), 1.0);
        assert_eq!(tiers.multiplier(Some("")), 1.0);
    }

    #[test]
    fn unknown_tier_is_standard() {
        let tiers = TierCatalog::default();
        for name in ["enterprise", "FLEX", "priority", "standard "] {
            assert_eq!(tiers.multiplier(Some(name)), 1.0, "tier {name}");
        }
    }

    #[test]
    fn insert_adds_tier() {
        let mut tiers = TierCatalog::default();
        tiers
            .insert("batch", ServiceTierMultiplier::new("batch", 0.5, "Overnight"))
            .unwrap();
        assert_eq!(tiers.multiplier(Some("batch")), 0.5);
        assert_eq!(tiers.entries().len(), 4);
    }

    #[test]
    fn insert_rejects_non_positive_multiplier() {
        let mut tiers = TierCatalog::default();
        assert!(tiers.insert("free", ServiceTierMultiplier::new("free", 0.0, "")).is_err());
        assert!(tiers.insert("nan", ServiceTierMultiplier::new("nan", f64::NAN, "")).is_err());
        assert_eq!(tiers.multiplier(Some("free")), 1.0);
    }

    #[test]
    fn standard_multiplier_is_pinned() {
        let mut tiers = TierCatalog::default();
        let err = tiers
            .insert("standard", ServiceTierMultiplier::new("standard", 2.0, ""))
            .unwrap_err();
        assert_eq!(err, CatalogError::StandardTierChanged { multiplier: 2.0 });

        tiers
            .insert("standard", ServiceTierMultiplier::new("standard", 1.0, "Default lane"))
            .unwrap();
        assert_eq!(tiers.get(None).description, "Default lane");
    }
}
