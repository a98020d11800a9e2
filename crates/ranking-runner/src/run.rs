use crate::config::RunnerConfig;
use crate::report::{FundamentalSummary, GroupSummary, RunReport, TechnicalSummary};
use anyhow::{Context, Result};
use chrono::Utc;
use fundamental_score::FundamentalScoreEngine;
use ranking_core::{join_group_scores, MarketCapAssignment, RankingError, RankingSink, StockSource};
use sector_scores::{refresh_group_scores, GroupKind, GroupPerformanceSource, GroupScoreSink};
use std::sync::Arc;
use technical_score::{TechnicalScore, TechnicalScoreEngine};

/// Which pipelines to run and how to report them.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub technical: bool,
    pub fundamental: bool,
    pub sectors: bool,
    pub dry_run: bool,
    pub top_n: usize,
}

/// Everything the runner needs from the external store.
pub trait RankingStore:
    StockSource + RankingSink + GroupPerformanceSource + GroupScoreSink + 'static
{
}

impl<T> RankingStore for T where
    T: StockSource + RankingSink + GroupPerformanceSource + GroupScoreSink + 'static
{
}

/// Optional enrichment inputs degrade to empty with a warning.
async fn optional<T>(label: &str, fetch: impl std::future::Future<Output = Result<Vec<T>, RankingError>>) -> Vec<T> {
    match fetch.await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!("Could not fetch {}: {}", label, e);
            Vec::new()
        }
    }
}

fn fresh_categories(scores: &[TechnicalScore]) -> Vec<MarketCapAssignment> {
    scores
        .iter()
        .filter_map(|s| {
            s.market_cap_category.map(|category| MarketCapAssignment {
                symbol: s.symbol.clone(),
                category,
            })
        })
        .collect()
}

pub async fn run<S: RankingStore>(store: Arc<S>, config: &RunnerConfig, options: &RunOptions) -> Result<RunReport> {
    let mut report = RunReport {
        dry_run: options.dry_run,
        ..RunReport::default()
    };

    // Group scores first so the technical run joins fresh values
    if options.sectors {
        for kind in [GroupKind::Sector, GroupKind::Industry] {
            match refresh_group_scores(store.as_ref(), kind, options.dry_run).await {
                Ok(refresh) => report.groups.push(GroupSummary::build(&refresh)),
                Err(e) => tracing::warn!("Skipping {} scores: {}", kind.key_column(), e),
            }
        }
    }

    if !(options.technical || options.fundamental) {
        return Ok(report);
    }

    tracing::info!("Fetching stock universe...");
    let stocks = store.fetch_stocks().await.context("fetching stock_data")?;
    if stocks.is_empty() {
        tracing::error!("No data found in stock_data");
        return Err(RankingError::EmptyUniverse.into());
    }

    let (sector_scores, industry_scores, overrides) = tokio::join!(
        optional("sector scores", store.fetch_sector_scores()),
        optional("industry scores", store.fetch_industry_scores()),
        optional("market cap categories", store.fetch_market_cap_categories()),
    );

    let technical = if options.technical {
        let stocks = join_group_scores(stocks.clone(), &sector_scores, &industry_scores);
        let engine = TechnicalScoreEngine::with_config(config.hierarchical(), config.tier_cutoffs());
        let task = tokio::task::spawn_blocking(move || engine.score(&stocks));
        Some(task.await.context("technical scoring task failed")??)
    } else {
        None
    };

    // Stored tiers lag this run; reuse the ones the technical pipeline just assigned
    let overrides = match &technical {
        Some(scores) => fresh_categories(scores),
        None => overrides,
    };

    let fundamental = if options.fundamental {
        let engine = FundamentalScoreEngine::with_config(config.percentile(), config.tier_cutoffs());
        let task = tokio::task::spawn_blocking(move || engine.score(&stocks, &overrides));
        Some(task.await.context("fundamental scoring task failed")??)
    } else {
        None
    };

    let update_date = Utc::now();
    if let Some(scores) = technical {
        let written = if options.dry_run {
            None
        } else {
            let rows: Vec<_> = scores.iter().map(|s| s.to_row(update_date)).collect();
            Some(store.upsert_technical(&rows, config.batch_size).await)
        };
        report.technical = Some(TechnicalSummary::build(&scores, written, options.top_n));
    }
    if let Some(scores) = fundamental {
        let written = if options.dry_run {
            None
        } else {
            let rows: Vec<_> = scores.iter().map(|s| s.to_row(update_date)).collect();
            Some(store.upsert_fundamental(&rows, config.batch_size).await)
        };
        report.fundamental = Some(FundamentalSummary::build(&scores, written, options.top_n));
    }

    Ok(report)
}
