//! Cost helpers that take a whole API response envelope
//!
//! They pull `usage`, `service_tier`, `model_name`, `results` and `logs` out
//! of the response and delegate to the [`CostCalculator`] aggregators.

use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::core::calculator::{CostCalculator, OperationOptions};
use crate::core::types::{
    AgentCostBreakdown, AgentSpec, BatchCostBreakdown, DateFilter, OperationRecord,
    SwarmCostBreakdown, UsageRecord, parse_agents, parse_records,
};
use crate::error::{EstimationError, json_kind};

static NULL: Value = Value::Null;

fn envelope(response: &Value) -> Result<&Map<String, Value>, EstimationError> {
    response.as_object().ok_or(EstimationError::InvalidEnvelope {
        field: "response",
        expected: "an object",
        found: json_kind(response),
    })
}

fn field<'a>(map: &'a Map<String, Value>, name: &str) -> &'a Value {
    map.get(name).unwrap_or(&NULL)
}

fn string_field<'a>(
    map: &'a Map<String, Value>,
    name: &'static str,
) -> Result<Option<&'a str>, EstimationError> {
    match field(map, name) {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.as_str())),
        other => Err(EstimationError::InvalidEnvelope {
            field: name,
            expected: "a string",
            found: json_kind(other),
        }),
    }
}

fn array_field<'a>(
    map: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a [Value], EstimationError> {
    match field(map, name) {
        Value::Null => Ok(&[]),
        Value::Array(items) => Ok(items.as_slice()),
        other => Err(EstimationError::InvalidEnvelope {
            field: name,
            expected: "an array",
            found: json_kind(other),
        }),
    }
}

/// Number of entries in `response[name]`, 0 when it is not an array
fn array_len(response: &Value, name: &str) -> usize {
    response
        .get(name)
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

/// Result records of a batch completion response
pub fn batch_records(response: &Value) -> Result<Vec<OperationRecord>, EstimationError> {
    parse_records("result", array_field(envelope(response)?, "results")?)
}

/// Entries of a logs response
pub fn log_records(response: &Value) -> Result<Vec<OperationRecord>, EstimationError> {
    parse_records("log entry", array_field(envelope(response)?, "logs")?)
}

/// Agent specs from a JSON array; `null` means none were given
pub fn agent_specs(value: &Value) -> Result<Option<Vec<AgentSpec>>, EstimationError> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => parse_agents(items).map(Some),
        other => Err(EstimationError::InvalidEnvelope {
            field: "agents",
            expected: "an array",
            found: json_kind(other),
        }),
    }
}

/// Agents listed in a swarm response's own `agents` field
pub fn swarm_agents(response: &Value) -> Result<Option<Vec<AgentSpec>>, EstimationError> {
    agent_specs(response.get("agents").unwrap_or(&NULL))
}

pub fn try_swarm_response_cost(
    calculator: &CostCalculator,
    response: &Value,
    agents: Option<&[AgentSpec]>,
) -> Result<SwarmCostBreakdown, EstimationError> {
    let map = envelope(response)?;
    let service_tier = string_field(map, "service_tier")?;
    calculator.try_calculate_swarm_cost(field(map, "usage"), agents, service_tier)
}

/// Cost of a swarm completion response, zeroed on failure
pub fn calculate_swarm_response_cost(
    calculator: &CostCalculator,
    response: &Value,
    agents: Option<&[AgentSpec]>,
) -> SwarmCostBreakdown {
    try_swarm_response_cost(calculator, response, agents).unwrap_or_else(|e| {
        error!(error = %e, "Error calculating swarm response cost");
        SwarmCostBreakdown::unavailable(&e)
    })
}

pub fn try_agent_response_cost(
    calculator: &CostCalculator,
    response: &Value,
) -> Result<AgentCostBreakdown, EstimationError> {
    let map = envelope(response)?;
    let record = OperationRecord {
        usage: field(map, "usage").clone(),
        model_name: string_field(map, "model_name")?.map(str::to_string),
        ..OperationRecord::default()
    };
    let total_cost = calculator.try_calculate_operation_cost(
        &record.usage,
        OperationOptions::default()
            .model(record.model())
            .tier(string_field(map, "service_tier")?),
    )?;
    Ok(AgentCostBreakdown {
        total_cost,
        most_used_model: record.model().to_string(),
        error: None,
    })
}

/// Cost of an agent completion response, zeroed on failure
pub fn calculate_agent_response_cost(calculator: &CostCalculator, response: &Value) -> AgentCostBreakdown {
    try_agent_response_cost(calculator, response).unwrap_or_else(|e| {
        error!(error = %e, "Error calculating agent response cost");
        AgentCostBreakdown::unavailable(&e)
    })
}

pub fn try_batch_response_cost(
    calculator: &CostCalculator,
    response: &Value,
) -> Result<BatchCostBreakdown, EstimationError> {
    let results = batch_records(response)?;
    let usage = batch_usage(response)?;
    calculator.try_calculate_batch_cost(&results, usage.as_ref())
}

/// Cost of a batch completion response, zeroed when the results cannot be
/// read. A malformed batch-level usage is ignored, since it is never priced.
pub fn calculate_batch_response_cost(calculator: &CostCalculator, response: &Value) -> BatchCostBreakdown {
    let results = match batch_records(response) {
        Ok(results) => results,
        Err(e) => {
            error!(error = %e, "Error calculating batch response cost");
            return BatchCostBreakdown::unavailable(array_len(response, "results"), &e);
        }
    };
    let usage = batch_usage(response).unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring malformed batch-level usage");
        None
    });
    calculator.calculate_batch_cost(&results, usage.as_ref())
}

/// Entries of a logs response that fall inside `filter`
fn filtered_logs(response: &Value, filter: &DateFilter) -> Result<Vec<OperationRecord>, EstimationError> {
    let logs = log_records(response)?;
    let total = logs.len();
    let kept = filter.apply(logs);
    if kept.len() != total {
        debug!(kept = kept.len(), total, "Filtered log entries by date");
    }
    Ok(kept)
}

pub fn try_logs_response_cost(
    calculator: &CostCalculator,
    response: &Value,
    filter: &DateFilter,
) -> Result<BatchCostBreakdown, EstimationError> {
    calculator.try_calculate_logs_cost(&filtered_logs(response, filter)?)
}

/// Cost of the logs in `response` inside `filter`, zeroed on failure
pub fn calculate_logs_response_cost(
    calculator: &CostCalculator,
    response: &Value,
    filter: &DateFilter,
) -> BatchCostBreakdown {
    match filtered_logs(response, filter) {
        Ok(logs) => calculator.calculate_logs_cost(&logs),
        Err(e) => {
            error!(error = %e, "Error calculating logs cost");
            BatchCostBreakdown::unavailable(array_len(response, "logs"), &e)
        }
    }
}

fn batch_usage(response: &Value) -> Result<Option<UsageRecord>, EstimationError> {
    match response.get("usage") {
        None | Some(Value::Null) => Ok(None),
        Some(usage) => UsageRecord::from_value(usage).map(Some),
    }
}
