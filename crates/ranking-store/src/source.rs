use crate::db::RankingDb;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use ranking_core::{GroupScore, MarketCapAssignment, MarketCapCategory, RankingError, StockRecord, StockSource};
use sector_scores::GroupKind;
use sqlx::Row;

/// `stock_data` columns that are never treated as metrics.
const IDENTITY_COLUMNS: &[&str] = &[
    "symbol",
    "sector",
    "industry",
    "market_capitalization",
    "analyst_rating",
];

impl RankingDb {
    /// Every REAL column of `stock_data` outside the identity set.
    pub async fn metric_columns(&self) -> StoreResult<Vec<String>> {
        let columns: Vec<(i64, String, String, i64, Option<String>, i64)> =
            sqlx::query_as("PRAGMA table_info(stock_data)")
                .fetch_all(self.pool())
                .await?;

        Ok(columns
            .into_iter()
            .filter(|(_, name, kind, _, _, _)| {
                kind.eq_ignore_ascii_case("REAL") && !IDENTITY_COLUMNS.contains(&name.as_str())
            })
            .map(|(_, name, _, _, _, _)| name)
            .collect())
    }

    pub async fn load_stocks(&self) -> StoreResult<Vec<StockRecord>> {
        let metrics = self.metric_columns().await?;
        let mut select = IDENTITY_COLUMNS.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        select.extend(metrics.iter().map(|c| format!("\"{}\"", c)));
        let query = format!("SELECT {} FROM stock_data ORDER BY symbol", select.join(", "));

        let rows = sqlx::query(&query).fetch_all(self.pool()).await?;
        let mut stocks = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(symbol) = row.try_get::<Option<String>, _>("symbol")?.filter(|s| !s.is_empty()) else {
                let err = StoreError::InvalidValue {
                    column: "symbol".into(),
                    value: "NULL".into(),
                };
                tracing::warn!("Skipping stock_data row: {}", err);
                continue;
            };
            let mut stock = StockRecord::new(symbol);
            stock.sector = row.try_get("sector")?;
            stock.industry = row.try_get("industry")?;
            stock.market_capitalization = row.try_get("market_capitalization")?;
            stock.analyst_rating = row.try_get("analyst_rating")?;
            for column in &metrics {
                if let Some(value) = row.try_get::<Option<f64>, _>(column.as_str())? {
                    stock.metrics.insert(column.clone(), value);
                }
            }
            stocks.push(stock);
        }

        tracing::info!(
            "Fetched {} records from stock_data ({} metric columns)",
            stocks.len(),
            metrics.len()
        );
        Ok(stocks)
    }

    /// 3-month momentum score of every sector or industry row.
    pub async fn load_group_scores(&self, kind: GroupKind) -> StoreResult<Vec<GroupScore>> {
        let query = format!(
            "SELECT {key}, normalized_score_3m FROM {table} ORDER BY {key}",
            key = kind.key_column(),
            table = kind.table()
        );
        let rows: Vec<(String, Option<f64>)> = sqlx::query_as(&query).fetch_all(self.pool()).await?;
        Ok(rows
            .into_iter()
            .map(|(name, score)| GroupScore { name, score })
            .collect())
    }

    pub async fn load_market_cap_categories(&self) -> StoreResult<Vec<MarketCapAssignment>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT symbol, market_cap_category FROM stock_rankings WHERE market_cap_category IS NOT NULL",
        )
        .fetch_all(self.pool())
        .await?;

        let mut assignments = Vec::with_capacity(rows.len());
        for (symbol, label) in rows {
            match label.parse::<MarketCapCategory>() {
                Ok(category) => assignments.push(MarketCapAssignment { symbol, category }),
                Err(_) => {
                    let err = StoreError::InvalidValue {
                        column: "market_cap_category".into(),
                        value: label,
                    };
                    tracing::warn!("Skipping {}: {}", symbol, err);
                }
            }
        }
        Ok(assignments)
    }
}

#[async_trait]
impl StockSource for RankingDb {
    async fn fetch_stocks(&self) -> Result<Vec<StockRecord>, RankingError> {
        self.load_stocks().await.map_err(StoreError::into_fetch)
    }

    async fn fetch_sector_scores(&self) -> Result<Vec<GroupScore>, RankingError> {
        self.load_group_scores(GroupKind::Sector)
            .await
            .map_err(StoreError::into_fetch)
    }

    async fn fetch_industry_scores(&self) -> Result<Vec<GroupScore>, RankingError> {
        self.load_group_scores(GroupKind::Industry)
            .await
            .map_err(StoreError::into_fetch)
    }

    async fn fetch_market_cap_categories(&self) -> Result<Vec<MarketCapAssignment>, RankingError> {
        self.load_market_cap_categories()
            .await
            .map_err(StoreError::into_fetch)
    }
}
