//! Command handlers for the `swarms-cost` binary

mod error;
mod input;

pub(crate) use error::AppError;
pub(crate) use input::read_json;

use std::path::Path;

use serde_json::Value;
use swarms_cost::core::{
    agent_specs, calculate_agent_response_cost, calculate_batch_response_cost,
    calculate_logs_response_cost, calculate_swarm_response_cost, swarm_agents,
    try_agent_response_cost, try_batch_response_cost, try_logs_response_cost,
    try_swarm_response_cost,
};
use swarms_cost::{
    AgentSpec, BatchCostBreakdown, CostCalculator, DateFilter, EstimationError, OperationOptions,
    SwarmCostBreakdown, UsageRecord,
};
use tracing::error;

use crate::cli::{Cli, Commands, EstimateArgs, LogsArgs};
use crate::client::SwarmsClient;
use crate::config::Config;
use crate::output::{
    agent_table, batch_tables, estimate_table, pricing_tables, print_json, print_tables,
    swarm_tables,
};
use crate::utils::parse_date;

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) config: &'a Config,
    pub(crate) calculator: &'a CostCalculator,
}

impl CommandContext<'_> {
    fn use_color(&self) -> bool {
        self.cli.use_color()
    }
}

/// Dispatch the parsed command
pub(crate) fn run(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    match &ctx.cli.command {
        Commands::Estimate(args) => handle_estimate(args, ctx),
        Commands::Agent { input } => handle_agent(input, ctx),
        Commands::Swarm { input, agents } => handle_swarm(input, agents.as_deref(), ctx),
        Commands::Batch { input } => handle_batch(input, ctx),
        Commands::Logs(args) => handle_logs(args, ctx),
        Commands::Pricing => handle_pricing(ctx),
    }
}

fn handle_estimate(args: &EstimateArgs, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let usage = UsageRecord {
        prompt_tokens: args.prompt_tokens,
        completion_tokens: args.completion_tokens,
        total_tokens: args.total_tokens,
    };
    let opts = OperationOptions {
        model_name: args.model.as_deref(),
        service_tier: args.tier.as_deref().or(ctx.config.service_tier.as_deref()),
        num_agents: args.agents,
    };
    let estimate = ctx.calculator.explain(&usage, opts)?;

    if ctx.cli.json {
        print_json(&estimate)
    } else {
        println!("{}", estimate_table(&estimate, ctx.use_color()));
        Ok(())
    }
}

fn handle_agent(input: &Path, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let response = read_json(input)?;
    let breakdown = if ctx.cli.strict {
        try_agent_response_cost(ctx.calculator, &response)?
    } else {
        calculate_agent_response_cost(ctx.calculator, &response)
    };

    if ctx.cli.json {
        print_json(&breakdown)
    } else {
        println!("{}", agent_table(&breakdown, ctx.use_color()));
        Ok(())
    }
}

/// Agents from `--agents FILE` take precedence over the response's own list
fn load_agents(
    response: &Value,
    agents_file: Option<&Path>,
) -> Result<Result<Option<Vec<AgentSpec>>, EstimationError>, AppError> {
    match agents_file {
        Some(path) => Ok(agent_specs(&read_json(path)?)),
        None => Ok(swarm_agents(response)),
    }
}

fn handle_swarm(
    input: &Path,
    agents_file: Option<&Path>,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    let response = read_json(input)?;
    let agents = load_agents(&response, agents_file)?;

    let breakdown = match agents {
        Ok(agents) if ctx.cli.strict => {
            try_swarm_response_cost(ctx.calculator, &response, agents.as_deref())?
        }
        Ok(agents) => calculate_swarm_response_cost(ctx.calculator, &response, agents.as_deref()),
        Err(e) if ctx.cli.strict => return Err(e.into()),
        Err(e) => {
            error!(error = %e, "Error reading swarm agents");
            SwarmCostBreakdown::unavailable(&e)
        }
    };

    if ctx.cli.json {
        print_json(&breakdown)
    } else {
        print_tables(&swarm_tables(&breakdown, ctx.use_color()));
        Ok(())
    }
}

fn handle_batch(input: &Path, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let response = read_json(input)?;
    let breakdown = if ctx.cli.strict {
        try_batch_response_cost(ctx.calculator, &response)?
    } else {
        calculate_batch_response_cost(ctx.calculator, &response)
    };
    print_batch(&breakdown, "Operations", ctx)
}

fn handle_logs(args: &LogsArgs, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let since = args.since.as_deref().map(parse_date).transpose()?;
    let until = args.until.as_deref().map(parse_date).transpose()?;
    let filter = DateFilter::new(since, until);

    let response = match args.input.as_deref() {
        Some(path) if !args.fetch => read_json(path)?,
        _ => fetch_logs(args, ctx)?,
    };

    let breakdown = logs_breakdown(&response, &filter, ctx)?;
    print_batch(&breakdown, "Log entries", ctx)
}

fn fetch_logs(args: &LogsArgs, ctx: &CommandContext<'_>) -> Result<Value, AppError> {
    let client = SwarmsClient::new(
        args.base_url.as_deref().or(ctx.config.base_url.as_deref()),
        args.api_key.as_deref().or(ctx.config.api_key.as_deref()),
    )?;
    client.get_logs()
}

fn logs_breakdown(
    response: &Value,
    filter: &DateFilter,
    ctx: &CommandContext<'_>,
) -> Result<BatchCostBreakdown, AppError> {
    if ctx.cli.strict {
        Ok(try_logs_response_cost(ctx.calculator, response, filter)?)
    } else {
        Ok(calculate_logs_response_cost(ctx.calculator, response, filter))
    }
}

fn print_batch(
    breakdown: &BatchCostBreakdown,
    label: &str,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    if ctx.cli.json {
        print_json(breakdown)
    } else {
        print_tables(&batch_tables(breakdown, label, ctx.use_color()));
        Ok(())
    }
}

fn handle_pricing(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let summary = ctx.calculator.pricing_summary();
    if ctx.cli.json {
        print_json(&summary)
    } else {
        print_tables(&pricing_tables(&summary, ctx.use_color()));
        Ok(())
    }
}
