//! CLI subcommand definitions

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Main CLI commands
#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Estimate the cost of a single operation from token counts
    Estimate(EstimateArgs),
    /// Cost of an agent completion response
    Agent {
        /// Response JSON file, or - for stdin
        input: PathBuf,
    },
    /// Cost of a swarm completion response
    Swarm {
        /// Response JSON file, or - for stdin
        input: PathBuf,
        /// JSON array of agent specs used by the swarm
        #[arg(long, value_name = "FILE")]
        agents: Option<PathBuf>,
    },
    /// Cost of a batch completion response
    Batch {
        /// Response JSON file, or - for stdin
        input: PathBuf,
    },
    /// Total cost and most used model across request logs
    Logs(LogsArgs),
    /// Show the pricing catalog and service tiers
    Pricing,
}

#[derive(Debug, Args)]
pub(crate) struct EstimateArgs {
    /// Prompt (input) tokens
    #[arg(short, long)]
    pub(crate) prompt_tokens: Option<u64>,

    /// Completion (output) tokens
    #[arg(short, long)]
    pub(crate) completion_tokens: Option<u64>,

    /// Total tokens; split 70/30 when no prompt/completion counts are given
    #[arg(short, long)]
    pub(crate) total_tokens: Option<u64>,

    /// Model name (partial names such as dated versions are matched)
    #[arg(short, long)]
    pub(crate) model: Option<String>,

    /// Service tier (standard, flex, premium, or a configured tier)
    #[arg(long)]
    pub(crate) tier: Option<String>,

    /// Number of agents taking part in the operation
    #[arg(short, long)]
    pub(crate) agents: Option<usize>,
}

#[derive(Debug, Args)]
pub(crate) struct LogsArgs {
    /// Logs response JSON file, or - for stdin
    #[arg(required_unless_present = "fetch", conflicts_with = "fetch")]
    pub(crate) input: Option<PathBuf>,

    /// Fetch logs from the Swarms API instead of reading a file
    #[arg(long)]
    pub(crate) fetch: bool,

    /// Filter from date (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long)]
    pub(crate) since: Option<String>,

    /// Filter until date (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long)]
    pub(crate) until: Option<String>,

    /// Swarms API key
    #[arg(long, env = "SWARMS_API_KEY", hide_env_values = true)]
    pub(crate) api_key: Option<String>,

    /// Swarms API base URL
    #[arg(long, env = "SWARMS_API_BASE_URL")]
    pub(crate) base_url: Option<String>,
}
