use serde::{Deserialize, Serialize};

/// Model pricing info (per 1000 tokens)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub model_name: String,
    pub input_cost_per_1k_tokens: f64,
    pub output_cost_per_1k_tokens: f64,
    #[serde(default)]
    pub description: String,
}

impl ModelPricing {
    pub fn new(
        model_name: impl Into<String>,
        input_cost_per_1k_tokens: f64,
        output_cost_per_1k_tokens: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            input_cost_per_1k_tokens,
            output_cost_per_1k_tokens,
            description: description.into(),
        }
    }

    pub(crate) fn has_valid_rates(&self) -> bool {
        [self.input_cost_per_1k_tokens, self.output_cost_per_1k_tokens]
            .iter()
            .all(|rate| rate.is_finite() && *rate >= 0.0)
    }
}

/// Cost multiplier for a named processing tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceTierMultiplier {
    pub tier_name: String,
    pub multiplier: f64,
    #[serde(default)]
    pub description: String,
}

impl ServiceTierMultiplier {
    pub fn new(tier_name: impl Into<String>, multiplier: f64, description: impl Into<String>) -> Self {
        Self {
            tier_name: tier_name.into(),
            multiplier,
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_rates() {
        assert!(ModelPricing::new("m", 0.0, 0.0, "").has_valid_rates());
        assert!(ModelPricing::new("m", 0.001, 0.002, "").has_valid_rates());
    }

    #[test]
    fn negative_or_non_finite_rates_are_invalid() {
        assert!(!ModelPricing::new("m", -0.001, 0.002, "").has_valid_rates());
        assert!(!ModelPricing::new("m", 0.001, f64::NAN, "").has_valid_rates());
        assert!(!ModelPricing::new("m", f64::INFINITY, 0.0, "").has_valid_rates());
    }

    #[test]
    fn pricing_deserializes_without_description() {
        let p: ModelPricing = serde_json::from_str(
            r#"{"model_name":"x","input_cost_per_1k_tokens":0.1,"output_cost_per_1k_tokens":0.2}"#,
        )
        .unwrap();
        assert_eq!(p.description, "");
        assert_eq!(p.output_cost_per_1k_tokens, 0.2);
    }
}
