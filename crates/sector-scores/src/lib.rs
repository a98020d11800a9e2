//! Sector and Industry Momentum Scores
//!
//! Scores every sector and industry on three holding horizons from its
//! performance table, using min-max normalized columns and fixed weights.
//! The 3-month score is joined onto stocks as enrichment.

pub mod parse;
pub mod scoring;
pub mod store;

pub use parse::parse_numeric;
pub use scoring::{score_groups, GroupMomentumScore, GroupPerformance, Horizon, PerformanceColumn};
pub use store::{refresh_group_scores, GroupKind, GroupPerformanceSource, GroupRefreshReport, GroupScoreSink};
