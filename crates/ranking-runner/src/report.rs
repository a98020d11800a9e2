use fundamental_score::{FundamentalScore, PeerLevelCounts};
use ranking_core::{MarketCapCategory, RankingError, UpsertSummary};
use sector_scores::GroupRefreshReport;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::cmp::Ordering;
use technical_score::TechnicalScore;

/// Spread of a score column.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreDistribution {
    pub mean: f64,
    /// Sample deviation; `None` for a single score
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl ScoreDistribution {
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        let std_dev = Statistics::std_dev(scores.iter());
        Some(Self {
            mean: Statistics::mean(scores.iter()),
            std_dev: std_dev.is_finite().then_some(std_dev),
            min: Statistics::min(scores.iter()),
            max: Statistics::max(scores.iter()),
        })
    }
}

/// One line of a top/bottom table.
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry {
    pub symbol: String,
    pub score: f64,
    pub market_cap_category: Option<MarketCapCategory>,
    pub sector: Option<String>,
}

/// Highest (or lowest) `n` scores; ties keep input order.
pub fn extremes<T>(items: &[T], n: usize, highest: bool, entry: impl Fn(&T) -> RankedEntry) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = items.iter().map(entry).collect();
    entries.sort_by(|a, b| {
        let ord = a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal);
        if highest {
            ord.reverse()
        } else {
            ord
        }
    });
    entries.truncate(n);
    entries
}

#[derive(Debug, Clone, Serialize)]
pub struct TechnicalSummary {
    pub processed: usize,
    pub ranked: usize,
    pub written: Option<UpsertSummary>,
    pub top: Vec<RankedEntry>,
}

impl TechnicalSummary {
    pub fn build(scores: &[TechnicalScore], written: Option<UpsertSummary>, top_n: usize) -> Self {
        Self {
            processed: scores.len(),
            ranked: scores.iter().filter(|s| s.rank.is_some()).count(),
            written,
            top: extremes(scores, top_n, true, |s| RankedEntry {
                symbol: s.symbol.clone(),
                score: s.composite_score,
                market_cap_category: s.market_cap_category,
                sector: s.sector.clone(),
            }),
        }
    }

    pub fn log(&self) {
        tracing::info!("==================================================");
        tracing::info!("COMPOSITE SCORE UPDATE SUMMARY");
        tracing::info!("Total processed: {} ({} ranked)", self.processed, self.ranked);
        log_written(self.written.as_ref());
        log_table("Top stocks by composite score", &self.top);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FundamentalSummary {
    pub processed: usize,
    pub written: Option<UpsertSummary>,
    pub distribution: Option<ScoreDistribution>,
    pub peer_levels: PeerLevelCounts,
    pub top: Vec<RankedEntry>,
    pub bottom: Vec<RankedEntry>,
}

impl FundamentalSummary {
    pub fn build(scores: &[FundamentalScore], written: Option<UpsertSummary>, top_n: usize) -> Self {
        let entry = |s: &FundamentalScore| RankedEntry {
            symbol: s.symbol.clone(),
            score: s.fundamental_score,
            market_cap_category: s.market_cap_category,
            sector: s.sector.clone(),
        };
        let values: Vec<f64> = scores.iter().map(|s| s.fundamental_score).collect();
        Self {
            processed: scores.len(),
            written,
            distribution: ScoreDistribution::from_scores(&values),
            peer_levels: PeerLevelCounts::tally(scores.iter().map(|s| &s.peer_level)),
            top: extremes(scores, top_n, true, entry),
            bottom: extremes(scores, top_n, false, entry),
        }
    }

    pub fn log(&self) {
        tracing::info!("==================================================");
        tracing::info!("FUNDAMENTAL SCORE UPDATE SUMMARY");
        tracing::info!("Total processed: {}", self.processed);
        log_written(self.written.as_ref());
        if let Some(d) = &self.distribution {
            tracing::info!(
                "Score distribution: mean={:.2} std={} min={:.2} max={:.2}",
                d.mean,
                d.std_dev.map_or_else(|| "n/a".to_string(), |s| format!("{:.2}", s)),
                d.min,
                d.max
            );
        }
        tracing::info!(
            "Peer level distribution: industry={} sector={} all={}",
            self.peer_levels.industry,
            self.peer_levels.sector,
            self.peer_levels.all
        );
        log_table("Top stocks by fundamental score", &self.top);
        log_table("Bottom stocks by fundamental score", &self.bottom);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub table: &'static str,
    pub scored: usize,
    pub written: Option<UpsertSummary>,
}

impl GroupSummary {
    pub fn build(report: &GroupRefreshReport) -> Self {
        Self {
            table: report.kind.table(),
            scored: report.scores.len(),
            written: report.written.clone(),
        }
    }

    pub fn log(&self) {
        tracing::info!("{}: {} groups scored", self.table, self.scored);
        log_written(self.written.as_ref());
    }
}

/// Everything a run produced, in the order the pipelines ran.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub groups: Vec<GroupSummary>,
    pub technical: Option<TechnicalSummary>,
    pub fundamental: Option<FundamentalSummary>,
}

impl RunReport {
    pub fn log(&self) {
        for group in &self.groups {
            group.log();
        }
        if let Some(t) = &self.technical {
            t.log();
        }
        if let Some(f) = &self.fundamental {
            f.log();
        }
    }

    /// A pipeline whose every write failed ends the run with an error.
    pub fn terminal_write_failure(&self) -> Option<RankingError> {
        let pipelines = [
            ("technical", self.technical.as_ref().and_then(|t| t.written.as_ref())),
            ("fundamental", self.fundamental.as_ref().and_then(|f| f.written.as_ref())),
        ];
        pipelines
            .into_iter()
            .find(|(_, w)| w.is_some_and(|w| w.succeeded == 0 && !w.is_clean()))
            .map(|(name, _)| RankingError::Persistence(format!("every {} batch failed", name)))
    }

    /// Rows that failed to write across every pipeline.
    pub fn failed_rows(&self) -> usize {
        let written = self
            .groups
            .iter()
            .map(|g| g.written.as_ref())
            .chain(self.technical.iter().map(|t| t.written.as_ref()))
            .chain(self.fundamental.iter().map(|f| f.written.as_ref()));
        written.flatten().map(|w| w.failed).sum()
    }
}

fn log_written(written: Option<&UpsertSummary>) {
    match written {
        Some(w) if w.is_clean() => {
            tracing::info!("Successful updates: {} of {}", w.succeeded, w.total());
        }
        Some(w) => {
            tracing::info!("Successful updates: {} of {}", w.succeeded, w.total());
            tracing::warn!("Failed updates: {}", w.failed);
            for failure in &w.failures {
                tracing::error!("  batch {} ({} rows): {}", failure.batch, failure.size, failure.cause);
            }
        }
        None => tracing::info!("Dry run: nothing written"),
    }
}

fn log_table(title: &str, entries: &[RankedEntry]) {
    tracing::info!("{}:", title);
    for e in entries {
        tracing::info!(
            "  {:<10} {:>8.2}  {:<10} {}",
            e.symbol,
            e.score,
            e.market_cap_category.map_or("-", |c| c.as_str()),
            e.sector.as_deref().unwrap_or("-")
        );
    }
}
