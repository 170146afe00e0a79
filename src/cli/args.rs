//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode};

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Debug, Parser)]
#[command(name = "swarms-cost")]
#[command(about = "Estimate the cost of Swarms API agent, swarm, batch and log responses", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Fail instead of reporting a zero cost when an estimate cannot be made
    #[arg(long, global = true)]
    pub(crate) strict: bool,

    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // Boolean flags: config only applies if CLI left them unset
        if !self.json && config.json {
            self.json = true;
        }
        if !self.strict && config.strict {
            self.strict = true;
        }
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Commands;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("swarms-cost").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["pricing", "--json", "--strict"]);
        assert!(cli.json);
        assert!(cli.strict);
        assert!(matches!(cli.command, Commands::Pricing));
    }

    #[test]
    fn config_fills_unset_flags() {
        let config: Config = toml::from_str("json = true\ncolor = \"always\"").unwrap();
        let cli = parse(&["pricing"]).with_config(&config);
        assert!(cli.json);
        assert_eq!(cli.color, ColorMode::Always);
        assert!(cli.use_color());
    }

    #[test]
    fn cli_color_beats_config() {
        let config: Config = toml::from_str("color = \"always\"").unwrap();
        let cli = parse(&["pricing", "--color", "never"]).with_config(&config);
        assert_eq!(cli.color, ColorMode::Never);
        assert!(!cli.use_color());
    }

    #[test]
    fn no_color_wins() {
        let cli = parse(&["pricing", "--color", "always", "--no-color"]);
        assert!(!cli.use_color());
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["swarms-cost"]).is_err());
    }
}
