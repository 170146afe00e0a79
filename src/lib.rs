//! Client-side cost estimation for the Swarms multi-agent completion API.
//!
//! A [`CostCalculator`] turns the token usage reported by agent, swarm,
//! batch and log responses into a USD estimate using a per-model pricing
//! catalog, service-tier multipliers and a flat per-operation overhead.
//!
//! Every estimate comes in two forms: `try_*` returns a typed
//! [`EstimationError`], while the plain form logs the failure and falls back
//! to a zero cost with `"unknown"` as the model, so a pricing problem never
//! breaks the request it is attached to.
//!
//! ```
//! use serde_json::json;
//! use swarms_cost::{CostCalculator, OperationOptions};
//!
//! let calculator = CostCalculator::new();
//! let cost = calculator.calculate_operation_cost(
//!     &json!({"prompt_tokens": 1000, "completion_tokens": 500}),
//!     OperationOptions::default().model("gpt-4o-mini").tier(Some("flex")),
//! );
//! assert!((cost - 0.001315).abs() < 1e-9);
//! ```

pub mod consts;
pub mod core;
pub mod error;
pub mod pricing;

pub use crate::core::{
    AgentCostBreakdown, AgentSpec, BatchCostBreakdown, CostCalculator, DateFilter,
    OperationEstimate, OperationOptions, OperationRecord, PricingSummary, SwarmCostBreakdown,
    UsageRecord,
};
pub use error::{CatalogError, EstimationError};
pub use pricing::{ModelPricing, ServiceTierMultiplier};
