use std::collections::HashMap;

use tracing::{info, warn};

use crate::consts::UNKNOWN_MODEL;
use crate::error::CatalogError;

use super::defaults::{default_models, unknown_model_pricing};
use super::resolver::{MatchKind, resolve_known};
use super::types::ModelPricing;

/// Per-model pricing table with an always-present `"unknown"` fallback
#[derive(Debug, Clone)]
pub struct PricingCatalog {
    models: HashMap<String, ModelPricing>,
    fallback: ModelPricing,
}

impl Default for PricingCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl PricingCatalog {
    /// Catalog holding the built-in model rates
    pub fn with_defaults() -> Self {
        Self {
            models: default_models()
                .into_iter()
                .map(|p| (p.model_name.clone(), p))
                .collect(),
            fallback: unknown_model_pricing(),
        }
    }

    /// Pricing for `model`; never fails, degrading to the `"unknown"` entry.
    pub fn get(&self, model: &str) -> &ModelPricing {
        self.resolve(model).0
    }

    pub fn resolve(&self, model: &str) -> (&ModelPricing, MatchKind) {
        if model == UNKNOWN_MODEL {
            return (&self.fallback, MatchKind::Exact);
        }
        match resolve_known(model, &self.models) {
            Some((pricing, MatchKind::Partial)) => {
                warn!(
                    model,
                    matched = %pricing.model_name,
                    "Using partial match for model pricing"
                );
                (pricing, MatchKind::Partial)
            }
            Some(found) => found,
            None => {
                warn!(model, "Unknown model, using default pricing");
                (&self.fallback, MatchKind::Fallback)
            }
        }
    }

    /// Add or replace pricing for `model`.
    pub fn insert(&mut self, model: &str, pricing: ModelPricing) -> Result<(), CatalogError> {
        if !pricing.has_valid_rates() {
            return Err(CatalogError::InvalidPricing {
                model: model.to_string(),
            });
        }
        if model == UNKNOWN_MODEL {
            self.fallback = pricing;
        } else {
            self.models.insert(model.to_string(), pricing);
        }
        info!(model, "Added pricing for model");
        Ok(())
    }

    /// All entries sorted by catalog key, sentinel included
    pub fn entries(&self) -> Vec<(&str, &ModelPricing)> {
        let mut entries: Vec<(&str, &ModelPricing)> = self
            .models
            .iter()
            .map(|(name, pricing)| (name.as_str(), pricing))
            .chain(std::iter::once((UNKNOWN_MODEL, &self.fallback)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_contain_sentinel() {
        let catalog = PricingCatalog::default();
        assert_eq!(catalog.get(UNKNOWN_MODEL).input_cost_per_1k_tokens, 0.001);
        assert_eq!(catalog.get(UNKNOWN_MODEL).output_cost_per_1k_tokens, 0.002);
        assert_eq!(catalog.entries().len(), 13);
    }

    #[test]
    fn case_variants_keep_their_own_rates() {
        let catalog = PricingCatalog::default();
        for (input, expected) in [("GPT-4O", "gpt-4o"), (" gpt-4o", "gpt-4o"), ("GPT-4", "gpt-4")] {
            let (pricing, kind) = catalog.resolve(input);
            assert_eq!(pricing.model_name, expected, "input {input:?}");
            assert_eq!(kind, MatchKind::Exact);
        }
    }

    #[test]
    fn unmatched_model_falls_back_to_unknown() {
        let catalog = PricingCatalog::default();
        let (pricing, kind) = catalog.resolve("llama-3-70b-instruct");
        assert_eq!(pricing.model_name, UNKNOWN_MODEL);
        assert_eq!(kind, MatchKind::Fallback);
    }

    #[test]
    fn empty_model_falls_back_to_unknown() {
        let catalog = PricingCatalog::default();
        assert_eq!(catalog.get("").model_name, UNKNOWN_MODEL);
    }

    #[test]
    fn versioned_openai_name_matches_mini() {
        let catalog = PricingCatalog::default();
        let (pricing, kind) = catalog.resolve("gpt-4o-mini-2024-07-18");
        assert_eq!(pricing.model_name, "gpt-4o-mini");
        assert_eq!(kind, MatchKind::Partial);
    }

    #[test]
    fn insert_overwrites_existing_entry() {
        let mut catalog = PricingCatalog::default();
        catalog
            .insert("gpt-4o", ModelPricing::new("gpt-4o", 1.0, 2.0, "repriced"))
            .unwrap();
        assert_eq!(catalog.get("gpt-4o").description, "repriced");
        assert_eq!(catalog.entries().len(), 13);
    }

    #[test]
    fn insert_can_reprice_sentinel() {
        let mut catalog = PricingCatalog::default();
        catalog
            .insert(UNKNOWN_MODEL, ModelPricing::new(UNKNOWN_MODEL, 0.5, 0.5, ""))
            .unwrap();
        assert_eq!(catalog.get("no-such-model").input_cost_per_1k_tokens, 0.5);
    }

    #[test]
    fn insert_rejects_negative_rates() {
        let mut catalog = PricingCatalog::default();
        let err = catalog
            .insert("bad", ModelPricing::new("bad", -1.0, 0.0, ""))
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::InvalidPricing {
                model: "bad".to_string()
            }
        );
        assert_eq!(catalog.get("bad").model_name, UNKNOWN_MODEL);
    }

    #[test]
    fn entries_are_sorted_and_include_sentinel() {
        let catalog = PricingCatalog::default();
        let names: Vec<&str> = catalog.entries().iter().map(|(n, _)| *n).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.contains(&UNKNOWN_MODEL));
    }
}
