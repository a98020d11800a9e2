use crate::scoring::{score_groups, GroupMomentumScore, GroupPerformance, Horizon};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ranking_core::{GroupScore, RankingError, UpsertSummary};
use serde::{Deserialize, Serialize};

/// Which performance table a group score belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Sector,
    Industry,
}

impl GroupKind {
    pub fn table(&self) -> &'static str {
        match self {
            GroupKind::Sector => "sector_data",
            GroupKind::Industry => "industry_data",
        }
    }

    pub fn key_column(&self) -> &'static str {
        match self {
            GroupKind::Sector => "sector",
            GroupKind::Industry => "industry",
        }
    }
}

#[async_trait]
pub trait GroupPerformanceSource: Send + Sync {
    async fn fetch_group_performance(&self, kind: GroupKind) -> Result<Vec<GroupPerformance>, RankingError>;
}

/// Writes horizon scores back onto existing performance rows.
#[async_trait]
pub trait GroupScoreSink: Send + Sync {
    async fn update_group_scores(
        &self,
        kind: GroupKind,
        scores: &[GroupMomentumScore],
        updated_at: DateTime<Utc>,
    ) -> UpsertSummary;
}

/// Outcome of one table refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRefreshReport {
    pub kind: GroupKind,
    pub scores: Vec<GroupMomentumScore>,
    /// `None` when the scores were not written
    pub written: Option<UpsertSummary>,
}

impl GroupRefreshReport {
    /// 3-month scores in the shape the stock enrichment join expects.
    pub fn enrichment(&self) -> Vec<GroupScore> {
        self.scores
            .iter()
            .map(|s| GroupScore {
                name: s.name.clone(),
                score: s.get(Horizon::ThreeMonth),
            })
            .collect()
    }
}

/// Fetch, score and (unless `dry_run`) write back one performance table.
pub async fn refresh_group_scores<S>(
    store: &S,
    kind: GroupKind,
    dry_run: bool,
) -> Result<GroupRefreshReport, RankingError>
where
    S: GroupPerformanceSource + GroupScoreSink,
{
    tracing::info!("Fetching {} performance rows", kind.key_column());
    let rows = store.fetch_group_performance(kind).await?;
    if rows.is_empty() {
        return Err(RankingError::UpstreamFetch(format!(
            "no rows in {}",
            kind.table()
        )));
    }
    tracing::info!("Fetched {} records from {}", rows.len(), kind.table());

    let scores = score_groups(&rows);
    let unscored = scores.iter().filter(|s| s.score_3m.is_none()).count();
    if unscored > 0 {
        tracing::warn!("{} {} rows have incomplete performance data", unscored, kind.key_column());
    }

    let written = if dry_run {
        None
    } else {
        let summary = store.update_group_scores(kind, &scores, Utc::now()).await;
        tracing::info!(
            "Updated {} {} scores, {} errors",
            summary.succeeded,
            kind.key_column(),
            summary.failed
        );
        Some(summary)
    };

    Ok(GroupRefreshReport {
        kind,
        scores,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::PerformanceColumn;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryTable {
        rows: Vec<GroupPerformance>,
        written: Mutex<Vec<GroupMomentumScore>>,
    }

    #[async_trait]
    impl GroupPerformanceSource for MemoryTable {
        async fn fetch_group_performance(&self, _kind: GroupKind) -> Result<Vec<GroupPerformance>, RankingError> {
            Ok(self.rows.clone())
        }
    }

    #[async_trait]
    impl GroupScoreSink for MemoryTable {
        async fn update_group_scores(
            &self,
            _kind: GroupKind,
            scores: &[GroupMomentumScore],
            _updated_at: DateTime<Utc>,
        ) -> UpsertSummary {
            let mut summary = UpsertSummary::default();
            self.written.lock().unwrap().extend_from_slice(scores);
            summary.record_success(scores.len());
            summary
        }
    }

    fn row(name: &str, v: f64) -> GroupPerformance {
        PerformanceColumn::ALL
            .iter()
            .fold(GroupPerformance::new(name), |r, c| r.with(*c, v))
    }

    #[tokio::test]
    async fn test_refresh_writes_scores() {
        let table = MemoryTable {
            rows: vec![row("Finance", 1.0), row("Utilities", 5.0)],
            ..Default::default()
        };
        let report = refresh_group_scores(&table, GroupKind::Sector, false).await.unwrap();
        assert_eq!(report.written.as_ref().map(|s| s.succeeded), Some(2));
        assert_eq!(table.written.lock().unwrap().len(), 2);

        let enrichment = report.enrichment();
        assert_eq!(enrichment[1].name, "Utilities");
        assert_eq!(enrichment[1].score, Some(100.0));
    }

    #[tokio::test]
    async fn test_dry_run_skips_write() {
        let table = MemoryTable {
            rows: vec![row("Chemicals", 2.0)],
            ..Default::default()
        };
        let report = refresh_group_scores(&table, GroupKind::Industry, true).await.unwrap();
        assert!(report.written.is_none());
        assert!(table.written.lock().unwrap().is_empty());
        // single row: every column flat
        assert_eq!(report.scores[0].score_3m, Some(100.0));
    }

    #[tokio::test]
    async fn test_empty_table_fails() {
        let table = MemoryTable::default();
        let err = refresh_group_scores(&table, GroupKind::Sector, false).await.unwrap_err();
        assert!(matches!(err, RankingError::UpstreamFetch(_)));
    }
}
