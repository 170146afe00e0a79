//! Swarm, batch and log cost aggregation
//!
//! Each aggregator prices records through the operation estimator and
//! reduces them to a breakdown with the most frequently used model.

use std::collections::BTreeMap;
use std::convert::Infallible;

use serde_json::Value;
use tracing::{debug, error};

use crate::consts::UNKNOWN_MODEL;
use crate::core::calculator::{CostCalculator, OperationOptions};
use crate::core::types::{
    AgentDetail, AgentSpec, BatchCostBreakdown, OperationRecord, SwarmCostBreakdown,
    SwarmCostDetail, UsageRecord, tier_label,
};
use crate::error::EstimationError;

/// Model usage counter that remembers first-seen order, so ties on the
/// highest count go to the model encountered first.
#[derive(Debug, Default, Clone)]
pub(crate) struct ModelTally {
    counts: Vec<(String, usize)>,
}

impl ModelTally {
    pub(crate) fn record(&mut self, model: &str) {
        match self.counts.iter_mut().find(|(name, _)| name == model) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((model.to_string(), 1)),
        }
    }

    pub(crate) fn most_used(&self) -> &str {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.counts {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map_or(UNKNOWN_MODEL, |(name, _)| name.as_str())
    }

    pub(crate) fn into_distribution(self) -> BTreeMap<String, usize> {
        self.counts.into_iter().collect()
    }
}

impl FromIterator<String> for ModelTally {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut tally = ModelTally::default();
        for model in iter {
            tally.record(&model);
        }
        tally
    }
}

impl CostCalculator {
    /// Price a swarm completion once at the swarm level.
    ///
    /// The usage covers the whole swarm, so it is priced at the fallback
    /// model rate with the agent multiplier for `agents.len()`. Agents are
    /// only used for the most-used model and the informational listing.
    pub fn try_calculate_swarm_cost(
        &self,
        usage: &Value,
        agents: Option<&[AgentSpec]>,
        service_tier: Option<&str>,
    ) -> Result<SwarmCostBreakdown, EstimationError> {
        let agents = agents.unwrap_or_default();
        let num_agents = (!agents.is_empty()).then_some(agents.len());

        let base_cost = self.try_calculate_operation_cost(
            usage,
            OperationOptions::default().tier(service_tier).agents(num_agents),
        )?;

        let tally: ModelTally = agents.iter().map(|a| a.model().to_string()).collect();
        let agent_details = agents
            .iter()
            .map(|agent| AgentDetail {
                agent_name: agent.name().to_string(),
                model: agent.model().to_string(),
                model_description: self.get_model_pricing(agent.model()).description.clone(),
            })
            .collect();

        Ok(SwarmCostBreakdown {
            total_cost: base_cost,
            most_used_model: tally.most_used().to_string(),
            cost_breakdown: Some(SwarmCostDetail {
                base_operation: base_cost,
                service_tier: tier_label(service_tier),
                num_agents: num_agents.unwrap_or(1),
            }),
            agent_details,
            error: None,
        })
    }

    /// Fail-safe swarm cost: any failure yields a zeroed breakdown.
    pub fn calculate_swarm_cost(
        &self,
        usage: &Value,
        agents: Option<&[AgentSpec]>,
        service_tier: Option<&str>,
    ) -> SwarmCostBreakdown {
        self.try_calculate_swarm_cost(usage, agents, service_tier)
            .unwrap_or_else(|e| {
                error!(error = %e, %usage, ?service_tier, "Error calculating swarm cost");
                SwarmCostBreakdown::unavailable(&e)
            })
    }

    /// Price each result independently and sum. Stops at the first result
    /// that cannot be priced.
    ///
    /// `batch_usage` is the batch-level usage some responses carry. It is
    /// only logged: per-result usage already covers the same tokens.
    pub fn try_calculate_batch_cost(
        &self,
        results: &[OperationRecord],
        batch_usage: Option<&UsageRecord>,
    ) -> Result<BatchCostBreakdown, EstimationError> {
        log_batch_usage(results.len(), batch_usage);
        self.sum_records(results, |record| self.try_record_cost(record))
    }

    /// Fail-safe batch cost. A result that cannot be priced contributes
    /// 0.0 but still counts toward the model distribution.
    pub fn calculate_batch_cost(
        &self,
        results: &[OperationRecord],
        batch_usage: Option<&UsageRecord>,
    ) -> BatchCostBreakdown {
        log_batch_usage(results.len(), batch_usage);
        let Ok(breakdown) = self.sum_records(results, |record| {
            Ok::<_, Infallible>(self.record_cost(record))
        });
        breakdown
    }

    /// Same as [`Self::try_calculate_batch_cost`] over log entries.
    pub fn try_calculate_logs_cost(
        &self,
        logs: &[OperationRecord],
    ) -> Result<BatchCostBreakdown, EstimationError> {
        self.sum_records(logs, |entry| self.try_record_cost(entry))
    }

    /// Fail-safe total cost and most used model over log entries.
    pub fn calculate_logs_cost(&self, logs: &[OperationRecord]) -> BatchCostBreakdown {
        let Ok(breakdown) =
            self.sum_records(logs, |entry| Ok::<_, Infallible>(self.record_cost(entry)));
        breakdown
    }

    fn try_record_cost(&self, record: &OperationRecord) -> Result<f64, EstimationError> {
        if let Some(defect) = record.defect() {
            return Err(defect.clone());
        }
        self.try_calculate_operation_cost(&record.usage, record_options(record))
    }

    fn record_cost(&self, record: &OperationRecord) -> f64 {
        match record.defect() {
            Some(defect) => {
                error!(error = %defect, "Error calculating operation cost");
                0.0
            }
            None => self.calculate_operation_cost(&record.usage, record_options(record)),
        }
    }

    fn sum_records<F, E>(
        &self,
        records: &[OperationRecord],
        mut cost_of: F,
    ) -> Result<BatchCostBreakdown, E>
    where
        F: FnMut(&OperationRecord) -> Result<f64, E>,
    {
        let mut total_cost = 0.0;
        let mut tally = ModelTally::default();

        for record in records {
            total_cost += cost_of(record)?;
            tally.record(record.model());
        }

        Ok(BatchCostBreakdown {
            total_cost,
            most_used_model: tally.most_used().to_string(),
            num_operations: records.len(),
            model_distribution: tally.into_distribution(),
            error: None,
        })
    }
}

fn log_batch_usage(num_operations: usize, batch_usage: Option<&UsageRecord>) {
    if let Some(usage) = batch_usage {
        debug!(
            reported_total_tokens = usage.token_counts().total,
            num_operations,
            "Batch-level usage reported"
        );
    }
}

fn record_options(record: &OperationRecord) -> OperationOptions<'_> {
    OperationOptions::default().model(record.model())
}
