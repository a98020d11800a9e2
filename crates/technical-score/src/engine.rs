use crate::derived::with_derived_metrics;
use crate::weights::TECHNICAL_METRICS;
use chrono::{DateTime, Utc};
use ranking_core::normalize::zscore_peer_group;
use ranking_core::stats::round_to;
use ranking_core::{
    assign_tier_ranks, classify_market_caps, coverage, HierarchicalStrategy, MarketCapCategory, MetricSpec,
    PeerGroup, PeerLevel, RankingError, StockRecord, TechnicalScoreRow, TierCutoffs,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tunables of the hierarchical z-score path.
#[derive(Debug, Clone)]
pub struct HierarchicalConfig {
    /// Industry intersections below this size use the tier × sector group
    pub min_industry_members: usize,
    /// Non-null values a metric needs within a group to be normalized at all
    pub min_values: usize,
    pub industry_weight: f64,
    pub sector_weight: f64,
}

impl Default for HierarchicalConfig {
    fn default() -> Self {
        Self {
            min_industry_members: 2,
            min_values: 3,
            industry_weight: 1.0,
            sector_weight: 0.8,
        }
    }
}

impl HierarchicalConfig {
    fn level_weight(&self, level: PeerLevel) -> f64 {
        match level {
            PeerLevel::Industry => self.industry_weight,
            PeerLevel::Sector => self.sector_weight,
            PeerLevel::All => 1.0,
        }
    }
}

/// Technical composite for one stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalScore {
    pub symbol: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap_category: Option<MarketCapCategory>,
    /// `None` when the stock could not be placed in any peer group
    pub peer_level: Option<PeerLevel>,
    /// Peer-weighted z-scores; metrics skipped for the group are absent
    pub normalized: BTreeMap<String, f64>,
    /// Unbounded weighted sum, two decimals
    pub composite_score: f64,
    pub rank: Option<u32>,
    pub sector_score: Option<f64>,
    pub industry_score: Option<f64>,
}

impl TechnicalScore {
    pub fn to_row(&self, update_date: DateTime<Utc>) -> TechnicalScoreRow {
        TechnicalScoreRow {
            symbol: self.symbol.clone(),
            composite_score: Some(self.composite_score),
            composite_rank: self.rank,
            market_cap_category: self.market_cap_category,
            peer_level: self.peer_level,
            sector_score: self.sector_score,
            industry_score: self.industry_score,
            update_date,
        }
    }
}

/// Hierarchical z-score composite over a whole universe.
pub struct TechnicalScoreEngine {
    config: HierarchicalConfig,
    cutoffs: TierCutoffs,
    metrics: Vec<MetricSpec>,
}

impl Default for TechnicalScoreEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TechnicalScoreEngine {
    pub fn new() -> Self {
        Self::with_config(HierarchicalConfig::default(), TierCutoffs::default())
    }

    pub fn with_config(config: HierarchicalConfig, cutoffs: TierCutoffs) -> Self {
        Self {
            config,
            cutoffs,
            metrics: TECHNICAL_METRICS.to_vec(),
        }
    }

    pub fn metrics(&self) -> &[MetricSpec] {
        &self.metrics
    }

    /// Score every stock. Output is aligned with the input order.
    pub fn score(&self, stocks: &[StockRecord]) -> Result<Vec<TechnicalScore>, RankingError> {
        if stocks.is_empty() {
            return Err(RankingError::EmptyUniverse);
        }
        tracing::info!("Scoring technical composite for {} stocks", stocks.len());

        let universe: Vec<StockRecord> = stocks.iter().map(with_derived_metrics).collect();
        coverage(&universe, &self.metrics);
        let categories = classify_market_caps(&universe, &self.cutoffs);

        let strategy = HierarchicalStrategy {
            min_industry_members: self.config.min_industry_members,
        };
        let grouping = strategy.resolve(&universe, &categories);

        // Groups are independent; collect keeps group order so output is deterministic
        let group_scores: Vec<Vec<(&'static str, Vec<f64>)>> = grouping
            .groups
            .par_iter()
            .map(|group| self.normalize_group(&universe, group))
            .collect();

        let mut normalized: Vec<BTreeMap<String, f64>> = vec![BTreeMap::new(); universe.len()];
        for (idx, assignment) in grouping.assignments.iter().enumerate() {
            let Some(group_id) = *assignment else {
                continue;
            };
            let group = &grouping.groups[group_id];
            let Some(position) = group.members.iter().position(|&m| m == idx) else {
                continue;
            };
            for (metric, values) in &group_scores[group_id] {
                normalized[idx].insert((*metric).to_string(), values[position]);
            }
        }

        let composites: Vec<f64> = normalized
            .iter()
            .map(|scores| self.composite(scores))
            .collect();
        let ranks = assign_tier_ranks(
            &categories,
            &composites.iter().copied().map(Some).collect::<Vec<_>>(),
        );

        let results: Vec<TechnicalScore> = universe
            .into_iter()
            .zip(normalized)
            .enumerate()
            .map(|(idx, (stock, normalized))| TechnicalScore {
                peer_level: grouping.group_of(idx).map(|g| g.level),
                market_cap_category: categories[idx],
                composite_score: composites[idx],
                rank: ranks[idx],
                normalized,
                symbol: stock.symbol,
                sector: stock.sector,
                industry: stock.industry,
                sector_score: stock.sector_score,
                industry_score: stock.industry_score,
            })
            .collect();

        tracing::info!(
            "Technical composite complete: {} scored, {} ranked",
            results.len(),
            results.iter().filter(|r| r.rank.is_some()).count()
        );
        Ok(results)
    }

    /// Z-score each configured metric across one peer group.
    fn normalize_group(
        &self,
        universe: &[StockRecord],
        group: &PeerGroup,
    ) -> Vec<(&'static str, Vec<f64>)> {
        let weight = self.config.level_weight(group.level);
        self.metrics
            .iter()
            .filter_map(|spec| {
                let values: Vec<Option<f64>> = group
                    .members
                    .iter()
                    .map(|&i| universe[i].metric(spec.name))
                    .collect();
                zscore_peer_group(&values, self.config.min_values, weight).map(|z| (spec.name, z))
            })
            .collect()
    }

    /// Weighted sum of normalized metrics; absent metrics contribute 0.
    pub fn composite(&self, normalized: &BTreeMap<String, f64>) -> f64 {
        let total: f64 = self
            .metrics
            .iter()
            .map(|spec| normalized.get(spec.name).copied().unwrap_or(0.0) * spec.weight)
            .sum();
        round_to(total, 2)
    }
}
