use serde_json::Value;
use thiserror::Error;

/// Failure while turning usage metadata into a cost estimate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    #[error("usage must be a JSON object, got {found}")]
    UsageNotObject { found: &'static str },

    #[error("invalid token count for \"{field}\": {value}")]
    InvalidTokenCount { field: &'static str, value: String },

    #[error("invalid {kind} at index {index}: {reason}")]
    InvalidRecord {
        kind: &'static str,
        index: usize,
        reason: String,
    },

    #[error("response field \"{field}\" must be {expected}, got {found}")]
    InvalidEnvelope {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("cost for model \"{model}\" is not a finite number")]
    NonFiniteCost { model: String },
}

/// Rejected pricing or service-tier catalog update
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("invalid pricing for model \"{model}\": rates must be finite and non-negative")]
    InvalidPricing { model: String },

    #[error("invalid multiplier {multiplier} for service tier \"{tier}\": must be finite and positive")]
    InvalidMultiplier { tier: String, multiplier: f64 },

    #[error("the \"standard\" service tier multiplier must stay 1.0 (got {multiplier})")]
    StandardTierChanged { multiplier: f64 },
}

/// Short name of a JSON value's type, for error messages
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
