use crate::aggregate::CategoryScores;
use crate::metrics::all_metrics;
use chrono::{DateTime, Utc};
use ranking_core::normalize::{apply_caps, percentile_score};
use ranking_core::{
    assign_tier_ranks, coverage, resolve_market_caps, FundamentalScoreRow, MarketCapAssignment,
    MarketCapCategory, MetricSpec, PeerLevel, PercentileStrategy, RankingError, StockRecord,
    TierCutoffs,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tunables of the percentile path.
#[derive(Debug, Clone)]
pub struct PercentileConfig {
    /// Rows a peer group needs before it is used instead of the next level up
    pub min_peers: usize,
    /// Non-null peer values needed to rank at all; below it the score is 50
    pub min_values: usize,
}

impl Default for PercentileConfig {
    fn default() -> Self {
        Self {
            min_peers: 5,
            min_values: 2,
        }
    }
}

/// Fundamental scores for one stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundamentalScore {
    pub symbol: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap_category: Option<MarketCapCategory>,
    pub peer_level: PeerLevel,
    /// Per-metric percentiles; metrics the stock lacks are absent
    pub percentiles: BTreeMap<String, f64>,
    pub quality_score: Option<f64>,
    pub growth_score: Option<f64>,
    pub valuation_score: Option<f64>,
    pub health_score: Option<f64>,
    pub fundamental_score: f64,
    pub rank: Option<u32>,
}

impl FundamentalScore {
    pub fn to_row(&self, update_date: DateTime<Utc>) -> FundamentalScoreRow {
        FundamentalScoreRow {
            symbol: self.symbol.clone(),
            fundamental_score: Some(self.fundamental_score),
            fundamental_rank: self.rank,
            quality_score: self.quality_score,
            growth_score: self.growth_score,
            valuation_score: self.valuation_score,
            health_score: self.health_score,
            market_cap_category: self.market_cap_category,
            peer_level: self.peer_level,
            update_date,
        }
    }
}

/// Per-level counts of resolved peer groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerLevelCounts {
    pub industry: usize,
    pub sector: usize,
    pub all: usize,
}

impl PeerLevelCounts {
    pub fn tally<'a>(levels: impl IntoIterator<Item = &'a PeerLevel>) -> Self {
        let mut counts = Self::default();
        for level in levels {
            match level {
                PeerLevel::Industry => counts.industry += 1,
                PeerLevel::Sector => counts.sector += 1,
                PeerLevel::All => counts.all += 1,
            }
        }
        counts
    }
}

pub struct FundamentalScoreEngine {
    config: PercentileConfig,
    cutoffs: TierCutoffs,
    metrics: Vec<MetricSpec>,
}

impl Default for FundamentalScoreEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FundamentalScoreEngine {
    pub fn new() -> Self {
        Self::with_config(PercentileConfig::default(), TierCutoffs::default())
    }

    pub fn with_config(config: PercentileConfig, cutoffs: TierCutoffs) -> Self {
        Self {
            config,
            cutoffs,
            metrics: all_metrics(),
        }
    }

    pub fn metrics(&self) -> &[MetricSpec] {
        &self.metrics
    }

    /// Score every stock. Output is aligned with the input order.
    ///
    /// `overrides` are stored tier assignments; when empty, tiers are
    /// classified from market capitalization.
    pub fn score(
        &self,
        stocks: &[StockRecord],
        overrides: &[MarketCapAssignment],
    ) -> Result<Vec<FundamentalScore>, RankingError> {
        if stocks.is_empty() {
            return Err(RankingError::EmptyUniverse);
        }
        tracing::info!("Scoring fundamentals for {} stocks", stocks.len());

        coverage(stocks, &self.metrics);
        let universe = apply_caps(stocks, &self.metrics);

        let strategy = PercentileStrategy {
            min_peers: self.config.min_peers,
        };
        let index = strategy.index(&universe);

        let scored: Vec<(PeerLevel, BTreeMap<String, f64>, CategoryScores)> = universe
            .par_iter()
            .map(|stock| {
                let (level, peers) = index.resolve(stock);
                let percentiles = self.percentiles(stock, peers, &universe);
                let categories = CategoryScores::from_percentiles(&percentiles);
                (level, percentiles, categories)
            })
            .collect();

        let counts = PeerLevelCounts::tally(scored.iter().map(|(level, _, _)| level));
        tracing::info!(
            "Peer group distribution: industry={}, sector={}, all={}",
            counts.industry,
            counts.sector,
            counts.all
        );

        let composites: Vec<Option<f64>> = scored
            .iter()
            .map(|(_, _, categories)| Some(categories.composite()))
            .collect();
        let tiers = resolve_market_caps(&universe, overrides, &self.cutoffs);
        let ranks = assign_tier_ranks(&tiers, &composites);

        let results: Vec<FundamentalScore> = universe
            .into_iter()
            .zip(scored)
            .enumerate()
            .map(|(idx, (stock, (peer_level, percentiles, categories)))| FundamentalScore {
                symbol: stock.symbol,
                sector: stock.sector,
                industry: stock.industry,
                market_cap_category: tiers[idx],
                peer_level,
                percentiles,
                quality_score: categories.quality,
                growth_score: categories.growth,
                valuation_score: categories.valuation,
                health_score: categories.health,
                fundamental_score: categories.composite(),
                rank: ranks[idx],
            })
            .collect();

        tracing::info!("Fundamental score calculation completed");
        Ok(results)
    }

    /// Percentile of every metric the stock has, against its peer rows.
    fn percentiles(
        &self,
        stock: &StockRecord,
        peers: &[usize],
        universe: &[StockRecord],
    ) -> BTreeMap<String, f64> {
        self.metrics
            .iter()
            .filter_map(|spec| {
                let peer_values: Vec<f64> = peers
                    .iter()
                    .filter_map(|&i| universe[i].metric(spec.name))
                    .collect();
                percentile_score(
                    stock.metric(spec.name),
                    &peer_values,
                    spec,
                    self.config.min_values,
                )
                .map(|p| (spec.name.to_string(), p))
            })
            .collect()
    }
}
