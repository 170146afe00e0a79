/// Fallback pricing key, also reported when no model could be determined
pub const UNKNOWN_MODEL: &str = "unknown";

/// Default service tier, always priced at 1.0x
pub const STANDARD_TIER: &str = "standard";

/// Agent name reported for agent specs without one
pub const UNKNOWN_AGENT: &str = "Unknown";

/// Flat per-operation API overhead in USD, independent of tokens
pub const OPERATION_OVERHEAD: f64 = 0.001;

/// Cost scaling per agent for multi-agent operations
pub const AGENT_COST_FACTOR: f64 = 0.8;

/// Upper bound on the agent multiplier
pub const MAX_AGENT_MULTIPLIER: f64 = 5.0;

/// Share of `total_tokens` attributed to the prompt when only the total is reported
pub const ESTIMATED_PROMPT_PERCENT: u64 = 70;

/// Costs are reported rounded to this many decimal places
pub const COST_DECIMALS: i32 = 6;
