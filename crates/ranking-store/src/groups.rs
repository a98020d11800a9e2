use crate::db::RankingDb;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ranking_core::{RankingError, UpsertSummary};
use sector_scores::{
    GroupKind, GroupMomentumScore, GroupPerformance, GroupPerformanceSource, GroupScoreSink,
    PerformanceColumn,
};
use sqlx::Row;

impl RankingDb {
    /// Performance rows with every cell read as text, so scraped strings
    /// and plain numbers parse the same way.
    pub async fn load_group_performance(&self, kind: GroupKind) -> StoreResult<Vec<GroupPerformance>> {
        let casts: Vec<String> = PerformanceColumn::ALL
            .iter()
            .map(|c| format!("CAST({col} AS TEXT) AS {col}", col = c.as_str()))
            .collect();
        let query = format!(
            "SELECT {key}, {casts} FROM {table} ORDER BY {key}",
            key = kind.key_column(),
            casts = casts.join(", "),
            table = kind.table()
        );

        let rows = sqlx::query(&query).fetch_all(self.pool()).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get(kind.key_column())?;
            let mut cells = Vec::with_capacity(PerformanceColumn::ALL.len());
            for column in PerformanceColumn::ALL {
                cells.push((column, row.try_get::<Option<String>, _>(column.as_str())?));
            }
            out.push(GroupPerformance::from_raw(
                name,
                cells.iter().map(|(c, v)| (*c, v.as_deref())),
            ));
        }
        Ok(out)
    }

    async fn write_group_score(
        &self,
        kind: GroupKind,
        score: &GroupMomentumScore,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let query = format!(
            "UPDATE {table} SET normalized_score_3m = ?, normalized_score_6m = ?, \
             normalized_score_1y = ?, updated_at = ? WHERE {key} = ?",
            table = kind.table(),
            key = kind.key_column()
        );
        let result = sqlx::query(&query)
            .bind(score.score_3m)
            .bind(score.score_6m)
            .bind(score.score_1y)
            .bind(updated_at)
            .bind(&score.name)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl GroupPerformanceSource for RankingDb {
    async fn fetch_group_performance(&self, kind: GroupKind) -> Result<Vec<GroupPerformance>, RankingError> {
        self.load_group_performance(kind)
            .await
            .map_err(StoreError::into_fetch)
    }
}

#[async_trait]
impl GroupScoreSink for RankingDb {
    /// One UPDATE per group; a row that matches nothing counts as an error.
    async fn update_group_scores(
        &self,
        kind: GroupKind,
        scores: &[GroupMomentumScore],
        updated_at: DateTime<Utc>,
    ) -> UpsertSummary {
        let mut summary = UpsertSummary::default();
        for (i, score) in scores.iter().enumerate() {
            match self.write_group_score(kind, score, updated_at).await {
                Ok(true) => {
                    tracing::debug!("Updated scores for {}: {}", kind.key_column(), score.name);
                    summary.record_success(1);
                }
                Ok(false) => {
                    tracing::warn!("Failed to update {}: {}", kind.key_column(), score.name);
                    summary.record_failure(i + 1, 1, format!("no {} row named {}", kind.key_column(), score.name));
                }
                Err(e) => {
                    tracing::error!("Error updating {} {}: {}", kind.key_column(), score.name, e);
                    summary.record_failure(i + 1, 1, e.to_string());
                }
            }
        }
        summary
    }
}
