use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// One traded instrument as fetched from the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockRecord {
    pub symbol: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_capitalization: Option<f64>,
    /// Free-text analyst consensus ("Strong Buy", "Hold", ...)
    #[serde(default)]
    pub analyst_rating: Option<String>,
    /// Named numeric metrics; an absent key means the value is missing.
    #[serde(default)]
    pub metrics: HashMap<String, f64>,
    /// 3-month sector momentum score, joined by exact sector name
    #[serde(default)]
    pub sector_score: Option<f64>,
    /// 3-month industry momentum score, joined by exact industry name
    #[serde(default)]
    pub industry_score: Option<f64>,
}

impl StockRecord {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_market_cap(mut self, market_cap: f64) -> Self {
        self.market_capitalization = Some(market_cap);
        self
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// Metric value, treating NaN and infinities as missing.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied().filter(|v| v.is_finite())
    }

    /// Market cap usable for tier assignment (non-negative and finite).
    pub fn usable_market_cap(&self) -> Option<f64> {
        self.market_capitalization.filter(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Rank-based market-cap bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MarketCapCategory {
    #[serde(rename = "Large Cap")]
    LargeCap,
    #[serde(rename = "Mid Cap")]
    MidCap,
    #[serde(rename = "Small Cap")]
    SmallCap,
    #[serde(rename = "Micro Cap")]
    MicroCap,
}

impl MarketCapCategory {
    pub const ALL: [MarketCapCategory; 4] = [
        MarketCapCategory::LargeCap,
        MarketCapCategory::MidCap,
        MarketCapCategory::SmallCap,
        MarketCapCategory::MicroCap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketCapCategory::LargeCap => "Large Cap",
            MarketCapCategory::MidCap => "Mid Cap",
            MarketCapCategory::SmallCap => "Small Cap",
            MarketCapCategory::MicroCap => "Micro Cap",
        }
    }
}

impl fmt::Display for MarketCapCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketCapCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Large Cap" => Ok(MarketCapCategory::LargeCap),
            "Mid Cap" => Ok(MarketCapCategory::MidCap),
            "Small Cap" => Ok(MarketCapCategory::SmallCap),
            "Micro Cap" => Ok(MarketCapCategory::MicroCap),
            other => Err(format!("unknown market cap category: {}", other)),
        }
    }
}

/// Which classification level a stock's peer group was resolved at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerLevel {
    Industry,
    Sector,
    All,
}

impl PeerLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeerLevel::Industry => "industry",
            PeerLevel::Sector => "sector",
            PeerLevel::All => "all",
        }
    }
}

impl fmt::Display for PeerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeerLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "industry" => Ok(PeerLevel::Industry),
            "sector" => Ok(PeerLevel::Sector),
            "all" => Ok(PeerLevel::All),
            other => Err(format!("unknown peer level: {}", other)),
        }
    }
}

/// Momentum score for a sector or industry, keyed by its exact name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupScore {
    pub name: String,
    pub score: Option<f64>,
}

/// Previously stored tier for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCapAssignment {
    pub symbol: String,
    pub category: MarketCapCategory,
}

/// Output row of the hierarchical (technical) pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalScoreRow {
    pub symbol: String,
    pub composite_score: Option<f64>,
    pub composite_rank: Option<u32>,
    pub market_cap_category: Option<MarketCapCategory>,
    pub peer_level: Option<PeerLevel>,
    pub sector_score: Option<f64>,
    pub industry_score: Option<f64>,
    pub update_date: DateTime<Utc>,
}

/// Output row of the percentile (fundamental) pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundamentalScoreRow {
    pub symbol: String,
    pub fundamental_score: Option<f64>,
    pub fundamental_rank: Option<u32>,
    pub quality_score: Option<f64>,
    pub growth_score: Option<f64>,
    pub valuation_score: Option<f64>,
    pub health_score: Option<f64>,
    pub market_cap_category: Option<MarketCapCategory>,
    pub peer_level: PeerLevel,
    pub update_date: DateTime<Utc>,
}

/// A write batch that failed; later batches still run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    /// 1-based batch number
    pub batch: usize,
    pub size: usize,
    pub cause: String,
}

/// Row counts of a batched upsert.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<BatchFailure>,
}

impl UpsertSummary {
    pub fn record_success(&mut self, size: usize) {
        self.succeeded += size;
    }

    pub fn record_failure(&mut self, batch: usize, size: usize, cause: impl Into<String>) {
        self.failed += size;
        self.failures.push(BatchFailure {
            batch,
            size,
            cause: cause.into(),
        });
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_filters_non_finite() {
        let stock = StockRecord::new("AAA")
            .with_metric("rsi", f64::NAN)
            .with_metric("adx", 21.0);
        assert_eq!(stock.metric("rsi"), None);
        assert_eq!(stock.metric("adx"), Some(21.0));
        assert_eq!(stock.metric("cci"), None);
    }

    #[test]
    fn test_category_round_trips_through_label() {
        for cat in MarketCapCategory::ALL {
            assert_eq!(cat.as_str().parse::<MarketCapCategory>().unwrap(), cat);
        }
        assert!("Mega Cap".parse::<MarketCapCategory>().is_err());
    }

    #[test]
    fn test_upsert_summary_counts() {
        let mut summary = UpsertSummary::default();
        summary.record_success(500);
        summary.record_failure(2, 120, "constraint failed");
        assert_eq!(summary.total(), 620);
        assert!(!summary.is_clean());
        assert_eq!(summary.failures[0].batch, 2);
    }
}
