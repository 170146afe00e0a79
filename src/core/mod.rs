//! Core module - usage types, the operation estimator and aggregation

mod aggregator;
mod calculator;
mod response;
mod types;

pub use calculator::{
    CostCalculator, ModelRates, OperationEstimate, OperationOptions, PricingSummary, TierRate,
    agent_multiplier, round_cost,
};
pub use response::{
    agent_specs, batch_records, calculate_agent_response_cost, calculate_batch_response_cost,
    calculate_logs_response_cost, calculate_swarm_response_cost, log_records,
    try_agent_response_cost, try_batch_response_cost, try_logs_response_cost,
    swarm_agents, try_swarm_response_cost,
};
pub use types::{
    AgentCostBreakdown, AgentDetail, AgentSpec, BatchCostBreakdown, DateFilter, OperationRecord,
    SwarmCostBreakdown, SwarmCostDetail, TokenCounts, UsageRecord, parse_agents, parse_records,
};
