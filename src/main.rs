mod app;
mod cli;
mod client;
mod config;
mod logging;
mod output;
mod utils;

use clap::Parser;
use swarms_cost::CostCalculator;

use app::{AppError, CommandContext};
use cli::Cli;
use config::Config;

fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let mut calculator = CostCalculator::new();
    config.apply_to(&mut calculator)?;
    app::run(&CommandContext {
        cli,
        config,
        calculator: &calculator,
    })
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let cli = cli.with_config(&config);

    logging::init(cli.debug);

    if let Err(e) = run(&cli, &config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
