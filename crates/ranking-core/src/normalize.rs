//! Metric normalization within a peer group.

use crate::metric::MetricSpec;
use crate::stats::{mean, round_to, std_dev, strict_percentile};
use crate::types::StockRecord;

/// Z-score every member of a peer group for one metric.
///
/// `values` holds the raw metric for each member (same order as the group).
/// Returns `None` when fewer than `min_values` members have a value, in
/// which case the metric is skipped for the whole group. Members with a
/// missing value score 0.0 (neutral). A zero standard deviation scores
/// every member 0.0.
pub fn zscore_peer_group(
    values: &[Option<f64>],
    min_values: usize,
    level_weight: f64,
) -> Option<Vec<f64>> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.len() < min_values {
        return None;
    }
    let m = mean(&present);
    let sd = std_dev(&present);
    if sd == 0.0 {
        return Some(vec![0.0; values.len()]);
    }
    Some(
        values
            .iter()
            .map(|v| v.map_or(0.0, |x| (x - m) / sd * level_weight))
            .collect(),
    )
}

/// Neutral percentile used when a peer set is too thin to rank against.
pub const NEUTRAL_PERCENTILE: f64 = 50.0;

/// Percentile (0-100, two decimals) of `value` against its peers' values.
///
/// - missing `value` → `None`
/// - `positive_only` metric with `value <= 0` → 0.0 regardless of peers,
///   and non-positive peer values are dropped before ranking
/// - fewer than `min_values` usable peer values → 50.0
pub fn percentile_score(
    value: Option<f64>,
    peer_values: &[f64],
    spec: &MetricSpec,
    min_values: usize,
) -> Option<f64> {
    let value = value?;
    if spec.positive_only && value <= 0.0 {
        return Some(0.0);
    }
    let peers: Vec<f64> = if spec.positive_only {
        peer_values.iter().copied().filter(|v| *v > 0.0).collect()
    } else {
        peer_values.to_vec()
    };
    if peers.len() < min_values {
        return Some(NEUTRAL_PERCENTILE);
    }
    Some(round_to(
        strict_percentile(value, &peers, spec.higher_is_better),
        2,
    ))
}

/// Copy the universe with every capped metric clipped to its ceiling.
///
/// Runs once per scoring run, before any peer statistics are taken.
pub fn apply_caps(stocks: &[StockRecord], specs: &[MetricSpec]) -> Vec<StockRecord> {
    let capped: Vec<&MetricSpec> = specs.iter().filter(|s| s.cap.is_some()).collect();
    for spec in &capped {
        tracing::debug!("Applying cap of {:?} to {}", spec.cap, spec.name);
    }
    stocks
        .iter()
        .map(|stock| {
            let mut out = stock.clone();
            for spec in &capped {
                if let Some(v) = out.metrics.get_mut(spec.name) {
                    *v = spec.apply_cap(*v);
                }
            }
            out
        })
        .collect()
}
