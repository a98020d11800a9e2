use crate::types::{GroupScore, StockRecord};
use std::collections::HashMap;

/// Attach sector and industry momentum scores by exact name match.
///
/// Stocks whose sector or industry has no score keep `None`.
pub fn join_group_scores(
    stocks: Vec<StockRecord>,
    sector_scores: &[GroupScore],
    industry_scores: &[GroupScore],
) -> Vec<StockRecord> {
    let sectors: HashMap<&str, Option<f64>> = sector_scores
        .iter()
        .map(|g| (g.name.as_str(), g.score))
        .collect();
    let industries: HashMap<&str, Option<f64>> = industry_scores
        .iter()
        .map(|g| (g.name.as_str(), g.score))
        .collect();

    stocks
        .into_iter()
        .map(|mut stock| {
            stock.sector_score = stock
                .sector
                .as_deref()
                .and_then(|s| sectors.get(s).copied().flatten());
            stock.industry_score = stock
                .industry
                .as_deref()
                .and_then(|i| industries.get(i).copied().flatten());
            stock
        })
        .collect()
}
