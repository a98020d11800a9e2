//! Hierarchical technical composite.
//!
//! Stocks are z-scored against tier × sector × industry peers (falling back
//! to tier × sector), each metric is scaled by a fixed importance weight and
//! the contributions are summed into an unbounded composite score.

pub mod derived;
pub mod engine;
pub mod weights;


pub use engine::{HierarchicalConfig, TechnicalScore, TechnicalScoreEngine};
pub use weights::TECHNICAL_METRICS;
