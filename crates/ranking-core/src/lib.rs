pub mod enrich;
pub mod error;
pub mod metric;
pub mod normalize;
pub mod peers;
pub mod ranking;
pub mod stats;
pub mod tiers;
pub mod traits;
pub mod types;

pub use enrich::join_group_scores;
pub use error::*;
pub use metric::{coverage, MetricCoverage, MetricSpec};
pub use peers::{HierarchicalGrouping, HierarchicalStrategy, PeerGroup, PercentileIndex, PercentileStrategy};
pub use ranking::assign_tier_ranks;
pub use tiers::{classify_market_caps, resolve_market_caps, TierCutoffs};
pub use traits::*;
pub use types::*;
