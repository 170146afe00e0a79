mod format;
mod json;
mod table;

pub(crate) use json::print_json;
pub(crate) use table::{
    agent_table, batch_tables, estimate_table, pricing_tables, print_tables, swarm_tables,
};
