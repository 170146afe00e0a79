use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::consts::{
    AGENT_COST_FACTOR, COST_DECIMALS, MAX_AGENT_MULTIPLIER, OPERATION_OVERHEAD, UNKNOWN_MODEL,
};
use crate::core::types::{TokenCounts, UsageRecord};
use crate::error::{CatalogError, EstimationError};
use crate::pricing::{
    MatchKind, ModelPricing, PricingCatalog, ServiceTierMultiplier, TierCatalog,
};

/// Optional inputs to a single operation estimate
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationOptions<'a> {
    pub model_name: Option<&'a str>,
    pub service_tier: Option<&'a str>,
    pub num_agents: Option<usize>,
}

impl<'a> OperationOptions<'a> {
    pub fn model(mut self, model_name: &'a str) -> Self {
        self.model_name = Some(model_name);
        self
    }

    pub fn tier(mut self, service_tier: Option<&'a str>) -> Self {
        self.service_tier = service_tier;
        self
    }

    pub fn agents(mut self, num_agents: Option<usize>) -> Self {
        self.num_agents = num_agents;
        self
    }
}

/// Full derivation of one operation's cost
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationEstimate {
    pub model: String,
    pub priced_as: String,
    pub partial_match: bool,
    pub tokens: TokenCounts,
    pub input_cost: f64,
    pub output_cost: f64,
    pub service_tier: String,
    pub tier_multiplier: f64,
    pub agent_multiplier: f64,
    pub overhead: f64,
    pub total_cost: f64,
}

/// Rates as reported by [`CostCalculator::pricing_summary`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRates {
    pub input_cost_per_1k_tokens: f64,
    pub output_cost_per_1k_tokens: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierRate {
    pub multiplier: f64,
    pub description: String,
}

/// Every model and tier the calculator knows, keyed by name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingSummary {
    pub models: BTreeMap<String, ModelRates>,
    pub service_tiers: BTreeMap<String, TierRate>,
}

/// Client-side cost estimator for Swarms API operations.
///
/// Holds the model pricing and service-tier catalogs. Estimates only read
/// the catalogs; updates need `&mut self`, so a calculator shared across
/// threads goes behind a lock.
#[derive(Debug, Clone, Default)]
pub struct CostCalculator {
    pricing: PricingCatalog,
    tiers: TierCatalog,
}

/// Cost scaling for operations spanning several agents; 1.0 for zero or one agent.
pub fn agent_multiplier(num_agents: Option<usize>) -> f64 {
    match num_agents {
        Some(n) if n > 1 => (n as f64 * AGENT_COST_FACTOR).min(MAX_AGENT_MULTIPLIER),
        _ => 1.0,
    }
}

pub fn round_cost(cost: f64) -> f64 {
    let scale = 10f64.powi(COST_DECIMALS);
    (cost * scale).round() / scale
}

impl CostCalculator {
    /// Calculator with the built-in model rates and tiers
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_model_pricing(&mut self, model_name: &str, pricing: ModelPricing) -> Result<(), CatalogError> {
        self.pricing.insert(model_name, pricing)
    }

    pub fn add_service_tier(
        &mut self,
        tier_name: &str,
        tier: ServiceTierMultiplier,
    ) -> Result<(), CatalogError> {
        self.tiers.insert(tier_name, tier)
    }

    pub fn get_model_pricing(&self, model_name: &str) -> &ModelPricing {
        self.pricing.get(model_name)
    }

    pub fn get_service_tier_multiplier(&self, service_tier: Option<&str>) -> f64 {
        self.tiers.multiplier(service_tier)
    }

    pub fn pricing(&self) -> &PricingCatalog {
        &self.pricing
    }

    pub fn tiers(&self) -> &TierCatalog {
        &self.tiers
    }

    /// Price one operation and report every factor that went into it.
    pub fn explain(
        &self,
        usage: &UsageRecord,
        opts: OperationOptions<'_>,
    ) -> Result<OperationEstimate, EstimationError> {
        let tokens = usage.token_counts();
        let model = opts.model_name.unwrap_or(UNKNOWN_MODEL);
        let (pricing, kind) = self.pricing.resolve(model);

        let input_cost = tokens.prompt as f64 / 1000.0 * pricing.input_cost_per_1k_tokens;
        let output_cost = tokens.completion as f64 / 1000.0 * pricing.output_cost_per_1k_tokens;
        let tier = self.tiers.get(opts.service_tier);
        let agents = agent_multiplier(opts.num_agents);

        let raw = (input_cost + output_cost) * tier.multiplier * agents + OPERATION_OVERHEAD;
        if !raw.is_finite() {
            return Err(EstimationError::NonFiniteCost {
                model: model.to_string(),
            });
        }
        let total_cost = round_cost(raw);

        debug!(
            model,
            priced_as = %pricing.model_name,
            total_tokens = tokens.total,
            prompt_tokens = tokens.prompt,
            completion_tokens = tokens.completion,
            estimated_split = tokens.estimated,
            service_tier = ?opts.service_tier,
            num_agents = ?opts.num_agents,
            cost = total_cost,
            "Cost calculation"
        );

        Ok(OperationEstimate {
            model: model.to_string(),
            priced_as: pricing.model_name.clone(),
            partial_match: kind == MatchKind::Partial,
            tokens,
            input_cost,
            output_cost,
            service_tier: tier.tier_name.clone(),
            tier_multiplier: tier.multiplier,
            agent_multiplier: agents,
            overhead: OPERATION_OVERHEAD,
            total_cost,
        })
    }

    /// Cost in USD of one operation described by typed usage, rounded to 6 decimals.
    pub fn estimate(&self, usage: &UsageRecord, opts: OperationOptions<'_>) -> Result<f64, EstimationError> {
        self.explain(usage, opts).map(|e| e.total_cost)
    }

    /// Validate a raw usage payload and price it.
    pub fn try_calculate_operation_cost(
        &self,
        usage: &Value,
        opts: OperationOptions<'_>,
    ) -> Result<f64, EstimationError> {
        let usage = UsageRecord::from_value(usage)?;
        self.estimate(&usage, opts)
    }

    /// Fail-safe variant of [`Self::try_calculate_operation_cost`]: errors are
    /// logged and reported as a cost of 0.0.
    pub fn calculate_operation_cost(&self, usage: &Value, opts: OperationOptions<'_>) -> f64 {
        match self.try_calculate_operation_cost(usage, opts) {
            Ok(cost) => cost,
            Err(e) => {
                error!(
                    error = %e,
                    %usage,
                    model = ?opts.model_name,
                    service_tier = ?opts.service_tier,
                    "Error calculating cost"
                );
                0.0
            }
        }
    }

    pub fn pricing_summary(&self) -> PricingSummary {
        PricingSummary {
            models: self
                .pricing
                .entries()
                .into_iter()
                .map(|(name, p)| {
                    (
                        name.to_string(),
                        ModelRates {
                            input_cost_per_1k_tokens: p.input_cost_per_1k_tokens,
                            output_cost_per_1k_tokens: p.output_cost_per_1k_tokens,
                            description: p.description.clone(),
                        },
                    )
                })
                .collect(),
            service_tiers: self
                .tiers
                .entries()
                .into_iter()
                .map(|(name, t)| {
                    (
                        name.to_string(),
                        TierRate {
                            multiplier: t.multiplier,
                            description: t.description.clone(),
                        },
                    )
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use serde_json::json;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn gpt_4o_mini_standard() {
        let calc = CostCalculator::new();
        let cost = calc.calculate_operation_cost(
            &json!({"prompt_tokens": 1000, "completion_tokens": 500}),
            OperationOptions::default().model("gpt-4o-mini").tier(Some("standard")),
        );
        // 1 * 0.00015 + 0.5 * 0.0006 = 0.00045, + 0.001 overhead
        assert!(close(cost, 0.00145), "cost {cost}");
    }

    #[test]
    fn gpt_4o_mini_flex() {
        let calc = CostCalculator::new();
        let cost = calc.calculate_operation_cost(
            &json!({"prompt_tokens": 1000, "completion_tokens": 500}),
            OperationOptions::default().model("gpt-4o-mini").tier(Some("flex")),
        );
        // 0.00045 * 0.7 = 0.000315, + 0.001
        assert!(close(cost, 0.001315), "cost {cost}");
    }

    #[test]
    fn empty_usage_costs_only_overhead() {
        let calc = CostCalculator::new();
        for (model, tier) in [(None, None), (Some("gpt-4"), Some("premium")), (Some("x"), Some("flex"))] {
            let opts = OperationOptions {
                model_name: model,
                service_tier: tier,
                num_agents: Some(10),
            };
            assert!(close(calc.calculate_operation_cost(&json!({}), opts), 0.001));
        }
    }

    #[test]
    fn total_only_usage_uses_estimated_split() {
        let calc = CostCalculator::new();
        let estimate = calc
            .explain(&UsageRecord::from_total(1000), OperationOptions::default())
            .unwrap();
        assert_eq!(estimate.tokens.prompt, 700);
        assert_eq!(estimate.tokens.completion, 300);
        // unknown: 0.7 * 0.001 + 0.3 * 0.002 = 0.0013, + 0.001
        assert!(close(estimate.total_cost, 0.0023));
        assert_eq!(estimate.priced_as, UNKNOWN_MODEL);
    }

    #[test]
    fn completion_tokens_are_monotonic() {
        let calc = CostCalculator::new();
        let opts = OperationOptions::default().model("claude-3-opus-20240229");
        let mut previous = 0.0;
        for completion in [0u64, 1, 10, 333, 1000, 50_000, 1_000_000] {
            let cost = calc.estimate(&UsageRecord::new(250, completion), opts).unwrap();
            assert!(cost >= previous, "{completion} tokens cost {cost} < {previous}");
            previous = cost;
        }
    }

    #[test]
    fn agent_multiplier_scales_and_caps() {
        assert_eq!(agent_multiplier(None), 1.0);
        assert_eq!(agent_multiplier(Some(0)), 1.0);
        assert_eq!(agent_multiplier(Some(1)), 1.0);
        assert!(close(agent_multiplier(Some(2)), 1.6));
        assert!(close(agent_multiplier(Some(6)), 4.8));
        assert_eq!(agent_multiplier(Some(7)), 5.0);
        assert_eq!(agent_multiplier(Some(100)), 5.0);
    }

    #[test]
    fn agent_multiplier_applies_to_token_cost_only() {
        let calc = CostCalculator::new();
        let usage = UsageRecord::new(1000, 1000);
        let single = calc.explain(&usage, OperationOptions::default()).unwrap();
        let swarm = calc
            .explain(&usage, OperationOptions::default().agents(Some(100)))
            .unwrap();
        assert_eq!(swarm.agent_multiplier, 5.0);
        let single_tokens = single.total_cost - OPERATION_OVERHEAD;
        let swarm_tokens = swarm.total_cost - OPERATION_OVERHEAD;
        assert!((swarm_tokens - single_tokens * 5.0).abs() < 1e-6);
    }

    #[test]
    fn cost_is_rounded_to_six_places() {
        let calc = CostCalculator::new();
        let cost = calc
            .estimate(&UsageRecord::new(1, 1), OperationOptions::default().model("gemini-1.5-flash"))
            .unwrap();
        // 0.000000075 + 0.0000003 rounds away, leaving the overhead
        assert_eq!(cost, 0.001);
    }

    #[test]
    fn partial_match_is_reported() {
        let calc = CostCalculator::new();
        let estimate = calc
            .explain(
                &UsageRecord::new(1000, 0),
                OperationOptions::default().model("gpt-4o-mini-2024-07-18"),
            )
            .unwrap();
        assert!(estimate.partial_match);
        assert_eq!(estimate.priced_as, "gpt-4o-mini");
    }

    #[test]
    fn invalid_usage_is_contained() {
        let calc = CostCalculator::new();
        for usage in [json!("not a dict"), json!([]), json!({"prompt_tokens": "many"}), json!(42)] {
            assert_eq!(calc.calculate_operation_cost(&usage, OperationOptions::default()), 0.0);
            assert!(calc.try_calculate_operation_cost(&usage, OperationOptions::default()).is_err());
        }
    }

    #[test]
    fn custom_pricing_and_tier_apply() {
        let mut calc = CostCalculator::new();
        calc.add_model_pricing("house-model", ModelPricing::new("house-model", 0.01, 0.02, ""))
            .unwrap();
        calc.add_service_tier("batch", ServiceTierMultiplier::new("batch", 0.5, ""))
            .unwrap();
        let cost = calc
            .estimate(
                &UsageRecord::new(1000, 1000),
                OperationOptions::default().model("house-model").tier(Some("batch")),
            )
            .unwrap();
        // (0.01 + 0.02) * 0.5 + 0.001
        assert!(close(cost, 0.016));
    }

    #[test]
    fn calculators_are_independent() {
        let mut a = CostCalculator::new();
        let b = CostCalculator::new();
        a.add_model_pricing("gpt-4o", ModelPricing::new("gpt-4o", 1.0, 1.0, "")).unwrap();
        assert_eq!(b.get_model_pricing("gpt-4o").input_cost_per_1k_tokens, 0.0025);
    }

    #[test]
    fn calculator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CostCalculator>();
    }

    #[test]
    fn pricing_summary_lists_all_entries() {
        let summary = CostCalculator::new().pricing_summary();
        assert_eq!(summary.models.len(), 13);
        assert_eq!(summary.models["gpt-4o"].output_cost_per_1k_tokens, 0.01);
        assert!(summary.models.contains_key(UNKNOWN_MODEL));
        assert_eq!(summary.service_tiers.len(), 3);
        assert_eq!(summary.service_tiers["flex"].multiplier, 0.7);
    }

    #[test]
    fn round_cost_six_places() {
        assert_eq!(round_cost(0.0014504), 0.00145);
        assert_eq!(round_cost(0.0014506), 0.001451);
        assert_eq!(round_cost(0.0), 0.0);
    }
}
