//! Core data types shared by the estimator and the aggregators
//!
//! Raw API payloads are validated into these types at the boundary.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::{ESTIMATED_PROMPT_PERCENT, STANDARD_TIER, UNKNOWN_AGENT, UNKNOWN_MODEL};
use crate::error::{EstimationError, json_kind};

/// Token usage reported for one completion; absent counts default to 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

/// Prompt/completion split actually priced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenCounts {
    pub prompt: u64,
    pub completion: u64,
    pub total: u64,
    /// Split derived from `total_tokens` alone
    pub estimated: bool,
}

impl UsageRecord {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens: Some(prompt_tokens),
            completion_tokens: Some(completion_tokens),
            total_tokens: None,
        }
    }

    pub fn from_total(total_tokens: u64) -> Self {
        Self {
            total_tokens: Some(total_tokens),
            ..Self::default()
        }
    }

    /// Validate a raw usage payload. `null` counts as absent usage; other
    /// keys in the object are ignored.
    pub fn from_value(value: &Value) -> Result<Self, EstimationError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self {
                prompt_tokens: token_field(map, "prompt_tokens")?,
                completion_tokens: token_field(map, "completion_tokens")?,
                total_tokens: token_field(map, "total_tokens")?,
            }),
            other => Err(EstimationError::UsageNotObject {
                found: json_kind(other),
            }),
        }
    }

    /// Resolve the priced split. When only a total is reported it is split
    /// 70/30 between prompt and completion, truncating the prompt share.
    pub fn token_counts(&self) -> TokenCounts {
        let prompt = self.prompt_tokens.unwrap_or(0);
        let completion = self.completion_tokens.unwrap_or(0);
        let total = self
            .total_tokens
            .unwrap_or_else(|| prompt.saturating_add(completion));

        if total != 0 && prompt == 0 && completion == 0 {
            let prompt =
                (u128::from(total) * u128::from(ESTIMATED_PROMPT_PERCENT) / 100) as u64;
            return TokenCounts {
                prompt,
                completion: total - prompt,
                total,
                estimated: true,
            };
        }

        TokenCounts {
            prompt,
            completion,
            total,
            estimated: false,
        }
    }
}

fn token_field(map: &Map<String, Value>, field: &'static str) -> Result<Option<u64>, EstimationError> {
    let invalid = |value: &Value| EstimationError::InvalidTokenCount {
        field,
        value: value.to_string(),
    };
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(count) = n.as_u64() {
                return Ok(Some(count));
            }
            // Integral floats such as 1200.0 are accepted.
            match n.as_f64() {
                Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                    Ok(Some(f as u64))
                }
                _ => Err(invalid(&Value::Number(n.clone()))),
            }
        }
        Some(other) => Err(invalid(other)),
    }
}

fn optional_string(
    map: &Map<String, Value>,
    keys: &[&str],
) -> Result<Option<String>, (&'static str, String)> {
    for key in keys {
        match map.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => return Ok(Some(s.clone())),
            Some(other) => {
                return Err((json_kind(other), (*key).to_string()));
            }
        }
    }
    Ok(None)
}

/// `timestamp` or `created_at` as text. Epoch seconds are converted to
/// RFC 3339; values of any other type leave the record undated.
fn record_timestamp(map: &Map<String, Value>) -> Option<String> {
    ["timestamp", "created_at"]
        .iter()
        .find_map(|key| match map.get(*key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => n
                .as_i64()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(|dt| dt.to_rfc3339()),
            _ => None,
        })
}

/// One priced unit inside a batch response or a log listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationRecord {
    /// Raw usage payload, validated when the record is priced
    pub usage: Value,
    pub model_name: Option<String>,
    /// `timestamp` or `created_at` of the entry, when reported
    pub timestamp: Option<String>,
    /// Set when a field needed for pricing was malformed; the record is
    /// still counted but cannot be priced
    pub(crate) defect: Option<EstimationError>,
}

impl OperationRecord {
    pub fn new(usage: Value, model_name: impl Into<String>) -> Self {
        Self {
            usage,
            model_name: Some(model_name.into()),
            ..Self::default()
        }
    }

    /// Parse one record. `kind` and `index` only label errors.
    pub fn from_value(kind: &'static str, index: usize, value: &Value) -> Result<Self, EstimationError> {
        let Value::Object(map) = value else {
            return Err(EstimationError::InvalidRecord {
                kind,
                index,
                reason: format!("expected an object, got {}", json_kind(value)),
            });
        };
        let (model_name, defect) = match optional_string(map, &["model_name", "model"]) {
            Ok(name) => (name, None),
            Err((found, key)) => (
                None,
                Some(EstimationError::InvalidRecord {
                    kind,
                    index,
                    reason: format!("\"{key}\" must be a string, got {found}"),
                }),
            ),
        };

        Ok(Self {
            usage: map.get("usage").cloned().unwrap_or(Value::Null),
            model_name,
            timestamp: record_timestamp(map),
            defect,
        })
    }

    /// Why this record cannot be priced, if a pricing field was malformed
    pub fn defect(&self) -> Option<&EstimationError> {
        self.defect.as_ref()
    }

    /// Model used for pricing and tallies
    pub fn model(&self) -> &str {
        match self.model_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_MODEL,
        }
    }

    /// Calendar date of the record's timestamp, in the timestamp's own offset
    pub fn date(&self) -> Option<NaiveDate> {
        let ts = self.timestamp.as_deref()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
            return Some(dt.date_naive());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt.date());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S%.f") {
            return Some(dt.date());
        }
        ts.get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
    }
}

/// Parse a JSON array of records
pub fn parse_records(
    kind: &'static str,
    values: &[Value],
) -> Result<Vec<OperationRecord>, EstimationError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| OperationRecord::from_value(kind, index, value))
        .collect()
}

/// Agent configuration as sent to or echoed by a swarm completion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
}

impl AgentSpec {
    pub fn new(agent_name: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            agent_name: Some(agent_name.into()),
            model_name: Some(model_name.into()),
        }
    }

    pub fn name(&self) -> &str {
        self.agent_name.as_deref().unwrap_or(UNKNOWN_AGENT)
    }

    pub fn model(&self) -> &str {
        self.model_name.as_deref().unwrap_or(UNKNOWN_MODEL)
    }
}

/// Parse a JSON array of agent specs; extra agent fields are ignored
pub fn parse_agents(values: &[Value]) -> Result<Vec<AgentSpec>, EstimationError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value.clone()).map_err(|e| EstimationError::InvalidRecord {
                kind: "agent",
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Inclusive date range for filtering records
#[derive(Debug, Clone, Copy, Default)]
pub struct DateFilter {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl DateFilter {
    pub fn new(since: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        Self { since, until }
    }

    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(s) = self.since
            && date < s
        {
            return false;
        }
        if let Some(u) = self.until
            && date > u
        {
            return false;
        }
        true
    }

    /// Records dated inside the range. Undated records only pass an unbounded filter.
    pub fn apply(&self, records: Vec<OperationRecord>) -> Vec<OperationRecord> {
        if self.is_unbounded() {
            return records;
        }
        records
            .into_iter()
            .filter(|r| r.date().is_some_and(|d| self.contains(d)))
            .collect()
    }
}

/// Swarm-level cost attribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwarmCostDetail {
    pub base_operation: f64,
    pub service_tier: String,
    pub num_agents: usize,
}

/// Informational per-agent listing; cost is attributed once per swarm
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentDetail {
    pub agent_name: String,
    pub model: String,
    pub model_description: String,
}

/// Cost summary for one swarm completion.
///
/// A `total_cost` of 0.0 with `most_used_model == "unknown"` means the
/// estimate was unavailable; `error` then carries the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwarmCostBreakdown {
    pub total_cost: f64,
    pub most_used_model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_breakdown: Option<SwarmCostDetail>,
    pub agent_details: Vec<AgentDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SwarmCostBreakdown {
    pub fn unavailable(error: &EstimationError) -> Self {
        Self {
            total_cost: 0.0,
            most_used_model: UNKNOWN_MODEL.to_string(),
            cost_breakdown: None,
            agent_details: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Cost summary over a batch of results or a list of log entries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchCostBreakdown {
    pub total_cost: f64,
    pub most_used_model: String,
    pub num_operations: usize,
    pub model_distribution: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchCostBreakdown {
    pub fn unavailable(num_operations: usize, error: &EstimationError) -> Self {
        Self {
            total_cost: 0.0,
            most_used_model: UNKNOWN_MODEL.to_string(),
            num_operations,
            model_distribution: BTreeMap::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Cost of a single agent completion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentCostBreakdown {
    pub total_cost: f64,
    pub most_used_model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentCostBreakdown {
    pub fn unavailable(error: &EstimationError) -> Self {
        Self {
            total_cost: 0.0,
            most_used_model: UNKNOWN_MODEL.to_string(),
            error: Some(error.to_string()),
        }
    }
}

pub(crate) fn tier_label(service_tier: Option<&str>) -> String {
    match service_tier {
        Some(tier) if !tier.is_empty() => tier.to_string(),
        _ => STANDARD_TIER.to_string(),
    }
}
