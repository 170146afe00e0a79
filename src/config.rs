use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use swarms_cost::{CatalogError, CostCalculator, ModelPricing, ServiceTierMultiplier};

use crate::app::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

/// Custom model rates, USD per 1K tokens
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConfigModel {
    pub(crate) input_cost_per_1k_tokens: f64,
    pub(crate) output_cost_per_1k_tokens: f64,
    #[serde(default)]
    pub(crate) description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConfigTier {
    pub(crate) multiplier: f64,
    #[serde(default)]
    pub(crate) description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) json: bool,
    #[serde(default)]
    pub(crate) strict: bool,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    /// Default tier for `estimate`
    #[serde(default)]
    pub(crate) service_tier: Option<String>,
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    #[serde(default)]
    pub(crate) models: BTreeMap<String, ConfigModel>,
    #[serde(default)]
    pub(crate) service_tiers: BTreeMap<String, ConfigTier>,
}

impl Config {
    /// Load from `explicit` if given (errors are fatal), else from the first
    /// default location that parses. Runs before logging is set up, so
    /// skipped files are reported on stderr directly.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        if let Some(path) = explicit {
            let content = fs::read_to_string(path).map_err(|source| AppError::Io {
                path: path.display().to_string(),
                source,
            })?;
            return Self::parse(path, &content);
        }

        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match Self::parse(&path, &content) {
                    Ok(config) => return Ok(config),
                    Err(e) => eprintln!("Warning: {e}"),
                }
            }
        }

        Ok(Self::default())
    }

    fn parse(path: &Path, content: &str) -> Result<Self, AppError> {
        toml::from_str::<Config>(content).map_err(|e| AppError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/swarms-cost/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("swarms-cost").join("config.toml"));
        }

        // 2. Platform config dir, e.g. ~/Library/Application Support on macOS
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("swarms-cost").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.swarms-cost.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".swarms-cost.toml"));
        }

        paths
    }

    /// Register configured models and tiers with the calculator.
    pub(crate) fn apply_to(&self, calculator: &mut CostCalculator) -> Result<(), CatalogError> {
        for (name, model) in &self.models {
            calculator.add_model_pricing(
                name,
                ModelPricing::new(
                    name.as_str(),
                    model.input_cost_per_1k_tokens,
                    model.output_cost_per_1k_tokens,
                    model.description.as_str(),
                ),
            )?;
        }
        for (name, tier) in &self.service_tiers {
            calculator.add_service_tier(
                name,
                ServiceTierMultiplier::new(name.as_str(), tier.multiplier, tier.description.as_str()),
            )?;
        }
        Ok(())
    }
}
