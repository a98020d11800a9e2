use anyhow::{Context, Result};
use fundamental_score::PercentileConfig;
use ranking_core::TierCutoffs;
use serde::{Deserialize, Serialize};
use std::env;
use technical_score::HierarchicalConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub database_url: String,
    pub batch_size: usize,

    // Tier boundaries (absolute positions by market cap)
    pub tier_large_cutoff: usize, // 100
    pub tier_mid_cutoff: usize,   // 250
    pub tier_small_cutoff: usize, // 500

    /// Non-null values a metric needs inside a hierarchical peer group
    pub hierarchical_min_peers: usize,
    /// Rows an industry or sector needs before percentile ranking uses it
    pub percentile_min_peers: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:rankings.db".to_string(),
            batch_size: 500,
            tier_large_cutoff: 100,
            tier_mid_cutoff: 250,
            tier_small_cutoff: 500,
            hierarchical_min_peers: 3,
            percentile_min_peers: 5,
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", name, raw)),
        Err(_) => Ok(default),
    }
}

impl RunnerConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            batch_size: parse_var("UPSERT_BATCH_SIZE", defaults.batch_size)?,
            tier_large_cutoff: parse_var("TIER_LARGE_CUTOFF", defaults.tier_large_cutoff)?,
            tier_mid_cutoff: parse_var("TIER_MID_CUTOFF", defaults.tier_mid_cutoff)?,
            tier_small_cutoff: parse_var("TIER_SMALL_CUTOFF", defaults.tier_small_cutoff)?,
            hierarchical_min_peers: parse_var("HIERARCHICAL_MIN_PEERS", defaults.hierarchical_min_peers)?,
            percentile_min_peers: parse_var("PERCENTILE_MIN_PEERS", defaults.percentile_min_peers)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            anyhow::bail!("UPSERT_BATCH_SIZE must be at least 1");
        }
        if !(self.tier_large_cutoff <= self.tier_mid_cutoff && self.tier_mid_cutoff <= self.tier_small_cutoff) {
            anyhow::bail!(
                "tier cutoffs must be ascending (got {}/{}/{})",
                self.tier_large_cutoff,
                self.tier_mid_cutoff,
                self.tier_small_cutoff
            );
        }
        Ok(())
    }

    pub fn tier_cutoffs(&self) -> TierCutoffs {
        TierCutoffs {
            large: self.tier_large_cutoff,
            mid: self.tier_mid_cutoff,
            small: self.tier_small_cutoff,
        }
    }

    pub fn hierarchical(&self) -> HierarchicalConfig {
        HierarchicalConfig {
            min_values: self.hierarchical_min_peers,
            ..HierarchicalConfig::default()
        }
    }

    pub fn percentile(&self) -> PercentileConfig {
        PercentileConfig {
            min_peers: self.percentile_min_peers,
            ..PercentileConfig::default()
        }
    }
}
