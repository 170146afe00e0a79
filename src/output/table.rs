use comfy_table::{Cell, Color, Table};

use swarms_cost::{
    AgentCostBreakdown, BatchCostBreakdown, OperationEstimate, PricingSummary, SwarmCostBreakdown,
};

use crate::output::format::{
    create_styled_table, format_cost, format_multiplier, format_number, format_rate, header_cell,
    right_cell, styled_cell,
};

fn color(use_color: bool, c: Color) -> Option<Color> {
    use_color.then_some(c)
}

fn field_table(use_color: bool) -> Table {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Field", use_color),
        header_cell("Value", use_color),
    ]);
    table
}

fn push_field(table: &mut Table, name: &str, value: &str) {
    table.add_row(vec![Cell::new(name), right_cell(value, None, false)]);
}

fn push_total(table: &mut Table, cost: f64, use_color: bool) {
    table.add_row(vec![
        styled_cell("Total cost", color(use_color, Color::Yellow), true),
        right_cell(&format_cost(cost), color(use_color, Color::Green), true),
    ]);
}

fn push_error(table: &mut Table, error: Option<&str>, use_color: bool) {
    if let Some(error) = error {
        table.add_row(vec![
            styled_cell("Estimate unavailable", color(use_color, Color::Red), true),
            styled_cell(error, color(use_color, Color::Red), false),
        ]);
    }
}

pub(crate) fn estimate_table(estimate: &OperationEstimate, use_color: bool) -> Table {
    let mut table = field_table(use_color);
    push_field(&mut table, "Model", &estimate.model);
    let priced_as = if estimate.partial_match {
        format!("{} (partial match)", estimate.priced_as)
    } else {
        estimate.priced_as.clone()
    };
    push_field(&mut table, "Priced as", &priced_as);

    let tokens = &estimate.tokens;
    let prompt = if tokens.estimated {
        format!("{} (estimated)", format_number(tokens.prompt))
    } else {
        format_number(tokens.prompt)
    };
    push_field(&mut table, "Prompt tokens", &prompt);
    push_field(&mut table, "Completion tokens", &format_number(tokens.completion));
    push_field(&mut table, "Total tokens", &format_number(tokens.total));
    push_field(&mut table, "Input cost", &format_cost(estimate.input_cost));
    push_field(&mut table, "Output cost", &format_cost(estimate.output_cost));
    push_field(
        &mut table,
        "Service tier",
        &format!(
            "{} ({})",
            estimate.service_tier,
            format_multiplier(estimate.tier_multiplier)
        ),
    );
    push_field(
        &mut table,
        "Agent multiplier",
        &format_multiplier(estimate.agent_multiplier),
    );
    push_field(&mut table, "Overhead", &format_cost(estimate.overhead));
    push_total(&mut table, estimate.total_cost, use_color);
    table
}

pub(crate) fn agent_table(breakdown: &AgentCostBreakdown, use_color: bool) -> Table {
    let mut table = field_table(use_color);
    push_field(&mut table, "Model", &breakdown.most_used_model);
    push_total(&mut table, breakdown.total_cost, use_color);
    push_error(&mut table, breakdown.error.as_deref(), use_color);
    table
}

pub(crate) fn swarm_tables(breakdown: &SwarmCostBreakdown, use_color: bool) -> Vec<Table> {
    let mut summary = field_table(use_color);
    push_field(&mut summary, "Most used model", &breakdown.most_used_model);
    if let Some(detail) = &breakdown.cost_breakdown {
        push_field(&mut summary, "Service tier", &detail.service_tier);
        push_field(&mut summary, "Agents", &detail.num_agents.to_string());
        push_field(&mut summary, "Base operation", &format_cost(detail.base_operation));
    }
    push_total(&mut summary, breakdown.total_cost, use_color);
    push_error(&mut summary, breakdown.error.as_deref(), use_color);

    let mut tables = vec![summary];
    if !breakdown.agent_details.is_empty() {
        let mut agents = create_styled_table();
        agents.set_header(vec![
            header_cell("Agent", use_color),
            header_cell("Model", use_color),
            header_cell("Description", use_color),
        ]);
        for agent in &breakdown.agent_details {
            agents.add_row(vec![
                Cell::new(&agent.agent_name),
                styled_cell(&agent.model, color(use_color, Color::Cyan), false),
                Cell::new(&agent.model_description),
            ]);
        }
        tables.push(agents);
    }
    tables
}

/// Summary plus per-model distribution, shared by batch and logs output
pub(crate) fn batch_tables(
    breakdown: &BatchCostBreakdown,
    label: &str,
    use_color: bool,
) -> Vec<Table> {
    let mut summary = field_table(use_color);
    push_field(&mut summary, label, &format_number(breakdown.num_operations as u64));
    push_field(&mut summary, "Most used model", &breakdown.most_used_model);
    push_total(&mut summary, breakdown.total_cost, use_color);
    push_error(&mut summary, breakdown.error.as_deref(), use_color);

    let mut tables = vec![summary];
    if !breakdown.model_distribution.is_empty() {
        let mut dist = create_styled_table();
        dist.set_header(vec![
            header_cell("Model", use_color),
            header_cell("Operations", use_color),
        ]);
        for (model, count) in &breakdown.model_distribution {
            let highlight = model == &breakdown.most_used_model;
            dist.add_row(vec![
                styled_cell(model, color(highlight && use_color, Color::Cyan), highlight),
                right_cell(&format_number(*count as u64), None, false),
            ]);
        }
        tables.push(dist);
    }
    tables
}

pub(crate) fn pricing_tables(summary: &PricingSummary, use_color: bool) -> Vec<Table> {
    let mut models = create_styled_table();
    models.set_header(vec![
        header_cell("Model", use_color),
        header_cell("Input / 1K", use_color),
        header_cell("Output / 1K", use_color),
        header_cell("Description", use_color),
    ]);
    for (name, rates) in &summary.models {
        models.add_row(vec![
            styled_cell(name, color(use_color, Color::Cyan), false),
            right_cell(&format_rate(rates.input_cost_per_1k_tokens), None, false),
            right_cell(&format_rate(rates.output_cost_per_1k_tokens), None, false),
            Cell::new(&rates.description),
        ]);
    }

    let mut tiers = create_styled_table();
    tiers.set_header(vec![
        header_cell("Service tier", use_color),
        header_cell("Multiplier", use_color),
        header_cell("Description", use_color),
    ]);
    for (name, tier) in &summary.service_tiers {
        tiers.add_row(vec![
            Cell::new(name),
            right_cell(&format_multiplier(tier.multiplier), None, false),
            Cell::new(&tier.description),
        ]);
    }

    vec![models, tiers]
}

pub(crate) fn print_tables(tables: &[Table]) {
    for table in tables {
        println!("{table}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use swarms_cost::{AgentSpec, CostCalculator, OperationOptions, OperationRecord, UsageRecord};

    #[test]
    fn estimate_table_lists_factors() {
        let calc = CostCalculator::new();
        let estimate = calc
            .explain(
                &UsageRecord::from_total(2000),
                OperationOptions::default().model("gpt-4o-2024-08-06").tier(Some("flex")),
            )
            .unwrap();
        let rendered = estimate_table(&estimate, false).to_string();
        assert!(rendered.contains("gpt-4o (partial match)"));
        assert!(rendered.contains("1,400 (estimated)"));
        assert!(rendered.contains("flex (0.70x)"));
        assert!(rendered.contains(&format_cost(estimate.total_cost)));
    }

    #[test]
    fn swarm_tables_include_agents() {
        let calc = CostCalculator::new();
        let agents = vec![
            AgentSpec::new("Researcher", "gpt-4o"),
            AgentSpec::new("Writer", "claude-3-haiku"),
        ];
        let breakdown = calc.calculate_swarm_cost(&json!({"total_tokens": 1000}), Some(&agents), None);
        let tables = swarm_tables(&breakdown, false);
        assert_eq!(tables.len(), 2);
        assert!(tables[1].to_string().contains("Researcher"));
    }

    #[test]
    fn failed_estimate_shows_reason() {
        let calc = CostCalculator::new();
        let breakdown = calc.calculate_swarm_cost(&json!("bad"), None, None);
        let rendered = swarm_tables(&breakdown, false)[0].to_string();
        assert!(rendered.contains("Estimate unavailable"));
    }

    #[test]
    fn batch_tables_show_distribution() {
        let calc = CostCalculator::new();
        let records = vec![
            OperationRecord::new(json!({"total_tokens": 100}), "gpt-4"),
            OperationRecord::new(json!({"total_tokens": 100}), "gpt-4"),
        ];
        let breakdown = calc.calculate_batch_cost(&records, None);
        let tables = batch_tables(&breakdown, "Operations", false);
        assert_eq!(tables.len(), 2);
        assert!(tables[1].to_string().contains("gpt-4"));
    }

    #[test]
    fn pricing_tables_cover_models_and_tiers() {
        let tables = pricing_tables(&CostCalculator::new().pricing_summary(), false);
        assert!(tables[0].to_string().contains("claude-3-opus"));
        assert!(tables[1].to_string().contains("premium"));
    }
}
