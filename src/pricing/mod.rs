mod catalog;
mod defaults;
mod resolver;
mod tiers;
mod types;

pub use catalog::PricingCatalog;
pub use resolver::MatchKind;
pub use tiers::TierCatalog;
pub use types::{ModelPricing, ServiceTierMultiplier};
