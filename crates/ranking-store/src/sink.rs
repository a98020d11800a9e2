use crate::db::RankingDb;
use async_trait::async_trait;
use ranking_core::{FundamentalScoreRow, RankingSink, TechnicalScoreRow, UpsertSummary};

const TECHNICAL_UPSERT: &str = r#"
    INSERT INTO stock_rankings (
        symbol, composite_score, composite_rank, market_cap_category,
        technical_peer_level, sector_score, industry_score, update_date
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(symbol) DO UPDATE SET
        composite_score = excluded.composite_score,
        composite_rank = excluded.composite_rank,
        market_cap_category = COALESCE(excluded.market_cap_category, stock_rankings.market_cap_category),
        technical_peer_level = excluded.technical_peer_level,
        sector_score = excluded.sector_score,
        industry_score = excluded.industry_score,
        update_date = excluded.update_date
"#;

const FUNDAMENTAL_UPSERT: &str = r#"
    INSERT INTO stock_rankings (
        symbol, fundamental_score, fundamental_rank, quality_score, growth_score,
        valuation_score, health_score, market_cap_category, peer_level, fundamental_update_date
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(symbol) DO UPDATE SET
        fundamental_score = excluded.fundamental_score,
        fundamental_rank = excluded.fundamental_rank,
        quality_score = excluded.quality_score,
        growth_score = excluded.growth_score,
        valuation_score = excluded.valuation_score,
        health_score = excluded.health_score,
        market_cap_category = COALESCE(excluded.market_cap_category, stock_rankings.market_cap_category),
        peer_level = excluded.peer_level,
        fundamental_update_date = excluded.fundamental_update_date
"#;

impl RankingDb {
    async fn write_technical_batch(&self, batch: &[TechnicalScoreRow]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool().begin().await?;
        for row in batch {
            sqlx::query(TECHNICAL_UPSERT)
                .bind(&row.symbol)
                .bind(row.composite_score)
                .bind(row.composite_rank.map(i64::from))
                .bind(row.market_cap_category.map(|c| c.as_str()))
                .bind(row.peer_level.map(|l| l.as_str()))
                .bind(row.sector_score)
                .bind(row.industry_score)
                .bind(row.update_date)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn write_fundamental_batch(&self, batch: &[FundamentalScoreRow]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool().begin().await?;
        for row in batch {
            sqlx::query(FUNDAMENTAL_UPSERT)
                .bind(&row.symbol)
                .bind(row.fundamental_score)
                .bind(row.fundamental_rank.map(i64::from))
                .bind(row.quality_score)
                .bind(row.growth_score)
                .bind(row.valuation_score)
                .bind(row.health_score)
                .bind(row.market_cap_category.map(|c| c.as_str()))
                .bind(row.peer_level.as_str())
                .bind(row.update_date)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl RankingSink for RankingDb {
    async fn upsert_technical(&self, rows: &[TechnicalScoreRow], batch_size: usize) -> UpsertSummary {
        tracing::info!("Updating stock_rankings with composite scores (batch mode)...");
        let mut summary = UpsertSummary::default();
        for (i, batch) in rows.chunks(batch_size.max(1)).enumerate() {
            match self.write_technical_batch(batch).await {
                Ok(()) => {
                    summary.record_success(batch.len());
                    tracing::info!("Batch {}: Updated {} records", i + 1, batch.len());
                }
                Err(e) => {
                    tracing::error!("Batch {} failed ({} records): {}", i + 1, batch.len(), e);
                    summary.record_failure(i + 1, batch.len(), e.to_string());
                }
            }
        }
        tracing::info!(
            "Update complete: {} successful, {} errors",
            summary.succeeded,
            summary.failed
        );
        summary
    }

    async fn upsert_fundamental(&self, rows: &[FundamentalScoreRow], batch_size: usize) -> UpsertSummary {
        tracing::info!("Updating stock_rankings with fundamental scores (batch mode)...");
        let mut summary = UpsertSummary::default();
        for (i, batch) in rows.chunks(batch_size.max(1)).enumerate() {
            match self.write_fundamental_batch(batch).await {
                Ok(()) => {
                    summary.record_success(batch.len());
                    tracing::info!("Batch {}: Updated {} records", i + 1, batch.len());
                }
                Err(e) => {
                    tracing::error!("Batch {} failed ({} records): {}", i + 1, batch.len(), e);
                    summary.record_failure(i + 1, batch.len(), e.to_string());
                }
            }
        }
        tracing::info!(
            "Update complete: {} successful, {} errors",
            summary.succeeded,
            summary.failed
        );
        summary
    }
}
