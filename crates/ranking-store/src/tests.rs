#[cfg(test)]
mod ranking_store_tests {
    use crate::db::RankingDb;
    use chrono::Utc;
    use ranking_core::{
        FundamentalScoreRow, MarketCapCategory, PeerLevel, RankingSink, StockSource, TechnicalScoreRow,
    };
    use sector_scores::{refresh_group_scores, GroupKind, GroupPerformanceSource, PerformanceColumn};

    async fn memory_db() -> RankingDb {
        RankingDb::new("sqlite::memory:").await.unwrap()
    }

    fn technical_row(symbol: &str, score: f64, rank: u32) -> TechnicalScoreRow {
        TechnicalScoreRow {
            symbol: symbol.to_string(),
            composite_score: Some(score),
            composite_rank: Some(rank),
            market_cap_category: Some(MarketCapCategory::LargeCap),
            peer_level: Some(PeerLevel::Industry),
            sector_score: Some(61.5),
            industry_score: None,
            update_date: Utc::now(),
        }
    }

    fn fundamental_row(symbol: &str, score: f64) -> FundamentalScoreRow {
        FundamentalScoreRow {
            symbol: symbol.to_string(),
            fundamental_score: Some(score),
            fundamental_rank: Some(1),
            quality_score: Some(70.0),
            growth_score: None,
            valuation_score: Some(20.0),
            health_score: Some(55.5),
            market_cap_category: None,
            peer_level: PeerLevel::Sector,
            update_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_fetch_stocks_reads_metric_columns() {
        let db = memory_db().await;
        sqlx::query(
            "INSERT INTO stock_data (symbol, sector, industry, market_capitalization, analyst_rating, rsi_14_1_day, pe_ratio)
             VALUES ('AAA', 'Tech', 'Software', 1.5e12, 'Buy', 61.2, NULL),
                    ('BBB', NULL, NULL, NULL, NULL, NULL, 14.0)",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let stocks = db.fetch_stocks().await.unwrap();
        assert_eq!(stocks.len(), 2);
        let a = &stocks[0];
        assert_eq!(a.symbol, "AAA");
        assert_eq!(a.industry.as_deref(), Some("Software"));
        assert_eq!(a.market_capitalization, Some(1.5e12));
        assert_eq!(a.analyst_rating.as_deref(), Some("Buy"));
        assert_eq!(a.metric("rsi_14_1_day"), Some(61.2));
        assert_eq!(a.metric("pe_ratio"), None);
        assert!(!a.metrics.contains_key("market_capitalization"));
        assert_eq!(stocks[1].metric("pe_ratio"), Some(14.0));

        let columns = db.metric_columns().await.unwrap();
        assert!(columns.contains(&"price".to_string()));
        assert!(!columns.contains(&"symbol".to_string()));
    }

    #[tokio::test]
    async fn test_pipelines_write_disjoint_columns() {
        let db = memory_db().await;
        let technical = db.upsert_technical(&[technical_row("AAA", 4.2, 1)], 500).await;
        assert!(technical.is_clean());
        let fundamental = db.upsert_fundamental(&[fundamental_row("AAA", 63.1)], 500).await;
        assert_eq!(fundamental.succeeded, 1);

        let (composite, category, fscore, peer): (Option<f64>, Option<String>, Option<f64>, Option<String>) =
            sqlx::query_as(
                "SELECT composite_score, market_cap_category, fundamental_score, peer_level
                 FROM stock_rankings WHERE symbol = 'AAA'",
            )
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(composite, Some(4.2));
        // the fundamental row had no category and must not clear the stored one
        assert_eq!(category.as_deref(), Some("Large Cap"));
        assert_eq!(fscore, Some(63.1));
        assert_eq!(peer.as_deref(), Some("sector"));

        let overrides = db.fetch_market_cap_categories().await.unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].category, MarketCapCategory::LargeCap);
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_stop_later_batches() {
        let db = memory_db().await;
        let rows = vec![
            technical_row("AAA", 3.0, 1),
            technical_row("BBB", 2.0, 2),
            technical_row("", 1.0, 3),
            technical_row("CCC", 0.5, 4),
            technical_row("DDD", 0.1, 5),
        ];
        let summary = db.upsert_technical(&rows, 2).await;

        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].batch, 2);
        assert_eq!(summary.failures[0].size, 2);

        let symbols: Vec<(String,)> = sqlx::query_as("SELECT symbol FROM stock_rankings ORDER BY symbol")
            .fetch_all(db.pool())
            .await
            .unwrap();
        let symbols: Vec<&str> = symbols.iter().map(|(s,)| s.as_str()).collect();
        // CCC shared the failed batch and was rolled back with it
        assert_eq!(symbols, vec!["AAA", "BBB", "DDD"]);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_previous_scores() {
        let db = memory_db().await;
        db.upsert_technical(&[technical_row("AAA", 1.0, 3)], 500).await;
        db.upsert_technical(&[technical_row("AAA", 9.0, 1)], 500).await;

        let (score, rank): (Option<f64>, Option<i64>) =
            sqlx::query_as("SELECT composite_score, composite_rank FROM stock_rankings WHERE symbol = 'AAA'")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(score, Some(9.0));
        assert_eq!(rank, Some(1));
    }

    #[tokio::test]
    async fn test_group_scores_round_trip_through_tables() {
        let db = memory_db().await;
        sqlx::query(
            "INSERT INTO sector_data (sector, market_cap, change_pct, perf_1w, perf_1m, perf_3m, perf_6m, perf_ytd, perf_1y, stocks)
             VALUES ('Finance', '1,200 B INR', '\u{2212}1.0%', '1%', '2%', '3%', '4%', '5%', '6%', '40'),
                    ('Utilities', '2.4 T INR', '+2.0%', '3%', '4%', '5%', '6%', '7%', '8%', '25')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let rows = db.fetch_group_performance(GroupKind::Sector).await.unwrap();
        assert_eq!(rows[0].get(PerformanceColumn::ChangePct), Some(-1.0));
        assert_eq!(rows[1].get(PerformanceColumn::MarketCap), Some(2.4));

        let report = refresh_group_scores(&db, GroupKind::Sector, false).await.unwrap();
        assert_eq!(report.written.as_ref().map(|s| s.succeeded), Some(2));

        let enrichment = db.fetch_sector_scores().await.unwrap();
        assert_eq!(enrichment.len(), 2);
        assert_eq!(enrichment[1].name, "Utilities");
        assert_eq!(enrichment[1].score, Some(100.0));
        assert_eq!(enrichment[0].score, Some(0.0));
    }
}
