//! Industry-relative percentile scoring of fundamentals.
//!
//! Every metric is ranked against the stock's industry (falling back to
//! sector, then the whole universe), blended into four category scores and
//! a 0-100 fundamental composite ranked within market-cap tiers.

pub mod aggregate;
pub mod engine;
pub mod metrics;


pub use engine::{FundamentalScore, FundamentalScoreEngine, PeerLevelCounts, PercentileConfig};
pub use metrics::Category;
