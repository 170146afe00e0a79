use crate::consts::{STANDARD_TIER, UNKNOWN_MODEL};

use super::types::{ModelPricing, ServiceTierMultiplier};

/// Built-in rates in USD per 1K tokens: (model, input, output, description)
const DEFAULT_MODELS: &[(&str, f64, f64, &str)] = &[
    // OpenAI
    ("gpt-4o", 0.0025, 0.01, "GPT-4 Omni"),
    ("gpt-4o-mini", 0.00015, 0.0006, "GPT-4 Omni Mini"),
    ("gpt-4", 0.03, 0.06, "GPT-4"),
    ("gpt-4-turbo", 0.01, 0.03, "GPT-4 Turbo"),
    ("gpt-3.5-turbo", 0.0005, 0.0015, "GPT-3.5 Turbo"),
    // Anthropic
    ("claude-3-5-sonnet-20241022", 0.003, 0.015, "Claude 3.5 Sonnet"),
    ("claude-3-5-haiku-20241022", 0.00025, 0.00125, "Claude 3.5 Haiku"),
    ("claude-3-opus-20240229", 0.015, 0.075, "Claude 3 Opus"),
    ("claude-3-sonnet-20240229", 0.003, 0.015, "Claude 3 Sonnet"),
    ("claude-3-haiku-20240307", 0.00025, 0.00125, "Claude 3 Haiku"),
    // Google
    ("gemini-1.5-pro", 0.0035, 0.0105, "Gemini 1.5 Pro"),
    ("gemini-1.5-flash", 0.000075, 0.0003, "Gemini 1.5 Flash"),
];

const DEFAULT_TIERS: &[(&str, f64, &str)] = &[
    ("flex", 0.7, "Lower cost but slower processing"),
    ("premium", 1.5, "Higher cost but faster processing"),
];

pub(super) fn default_models() -> Vec<ModelPricing> {
    DEFAULT_MODELS
        .iter()
        .map(|&(name, input, output, description)| {
            ModelPricing::new(name, input, output, description)
        })
        .collect()
}

pub(super) fn unknown_model_pricing() -> ModelPricing {
    ModelPricing::new(
        UNKNOWN_MODEL,
        0.001,
        0.002,
        "Unknown model (using default pricing)",
    )
}

pub(super) fn default_tiers() -> Vec<ServiceTierMultiplier> {
    DEFAULT_TIERS
        .iter()
        .map(|&(name, multiplier, description)| {
            ServiceTierMultiplier::new(name, multiplier, description)
        })
        .collect()
}

pub(super) fn standard_tier() -> ServiceTierMultiplier {
    ServiceTierMultiplier::new(STANDARD_TIER, 1.0, "Standard processing tier")
}
