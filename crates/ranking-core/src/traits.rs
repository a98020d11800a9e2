use async_trait::async_trait;
use crate::{
    FundamentalScoreRow, GroupScore, MarketCapAssignment, RankingError, StockRecord,
    TechnicalScoreRow, UpsertSummary,
};

/// Read side of the external store. Everything is fetched once per run.
#[async_trait]
pub trait StockSource: Send + Sync {
    async fn fetch_stocks(&self) -> Result<Vec<StockRecord>, RankingError>;

    async fn fetch_sector_scores(&self) -> Result<Vec<GroupScore>, RankingError>;

    async fn fetch_industry_scores(&self) -> Result<Vec<GroupScore>, RankingError>;

    async fn fetch_market_cap_categories(&self) -> Result<Vec<MarketCapAssignment>, RankingError>;
}

/// Write side of the external store.
///
/// Upserts are keyed by symbol and chunked into `batch_size` batches. A
/// failed batch is recorded in the summary and the remaining batches still run.
#[async_trait]
pub trait RankingSink: Send + Sync {
    async fn upsert_technical(&self, rows: &[TechnicalScoreRow], batch_size: usize) -> UpsertSummary;

    async fn upsert_fundamental(&self, rows: &[FundamentalScoreRow], batch_size: usize) -> UpsertSummary;
}
