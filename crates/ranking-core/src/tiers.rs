//! Market-cap tier classification.
//!
//! Tiers are absolute rank cutoffs over the whole universe, not percentages.

use crate::types::{MarketCapAssignment, MarketCapCategory, StockRecord};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Exclusive rank cutoffs for the first three tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierCutoffs {
    pub large: usize,
    pub mid: usize,
    pub small: usize,
}

impl Default for TierCutoffs {
    fn default() -> Self {
        Self {
            large: 100,
            mid: 250,
            small: 500,
        }
    }
}

impl TierCutoffs {
    /// Tier for a 0-based position in the descending market-cap ordering.
    pub fn category_for_position(&self, position: usize) -> MarketCapCategory {
        if position < self.large {
            MarketCapCategory::LargeCap
        } else if position < self.mid {
            MarketCapCategory::MidCap
        } else if position < self.small {
            MarketCapCategory::SmallCap
        } else {
            MarketCapCategory::MicroCap
        }
    }
}

/// Assign a tier to every stock, aligned with the input order.
///
/// Stocks are ordered by market cap descending with nulls last (stable on
/// ties). Stocks without a usable market cap get `None`.
pub fn classify_market_caps(
    stocks: &[StockRecord],
    cutoffs: &TierCutoffs,
) -> Vec<Option<MarketCapCategory>> {
    let mut order: Vec<usize> = (0..stocks.len()).collect();
    order.sort_by(|&a, &b| {
        match (stocks[a].usable_market_cap(), stocks[b].usable_market_cap()) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });

    let mut categories = vec![None; stocks.len()];
    for (position, &idx) in order.iter().enumerate() {
        if stocks[idx].usable_market_cap().is_some() {
            categories[idx] = Some(cutoffs.category_for_position(position));
        }
    }

    let mut counts: HashMap<MarketCapCategory, usize> = HashMap::new();
    for cat in categories.iter().flatten() {
        *counts.entry(*cat).or_default() += 1;
    }
    tracing::info!(
        "Market cap distribution: large={} mid={} small={} micro={} unclassified={}",
        counts.get(&MarketCapCategory::LargeCap).copied().unwrap_or(0),
        counts.get(&MarketCapCategory::MidCap).copied().unwrap_or(0),
        counts.get(&MarketCapCategory::SmallCap).copied().unwrap_or(0),
        counts.get(&MarketCapCategory::MicroCap).copied().unwrap_or(0),
        categories.iter().filter(|c| c.is_none()).count()
    );

    categories
}

/// Use stored tiers when any exist, otherwise classify from market caps.
///
/// With overrides present, symbols missing from them stay unclassified.
pub fn resolve_market_caps(
    stocks: &[StockRecord],
    overrides: &[MarketCapAssignment],
    cutoffs: &TierCutoffs,
) -> Vec<Option<MarketCapCategory>> {
    if overrides.is_empty() {
        return classify_market_caps(stocks, cutoffs);
    }
    let lookup: HashMap<&str, MarketCapCategory> = overrides
        .iter()
        .map(|a| (a.symbol.as_str(), a.category))
        .collect();
    stocks
        .iter()
        .map(|s| lookup.get(s.symbol.as_str()).copied())
        .collect()
}
