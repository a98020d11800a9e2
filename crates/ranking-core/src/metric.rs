use crate::types::StockRecord;
use serde::Serialize;

/// Static configuration of one scored metric.
///
/// Tables of these are declared as `const` slices in the scoring crates.
/// Per-stock weight renormalization never mutates a spec.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSpec {
    pub name: &'static str,
    pub weight: f64,
    pub higher_is_better: bool,
    /// Ceiling applied to raw values before any normalization
    pub cap: Option<f64>,
    /// Valuation-style ratio: non-positive values mean a loss-making company
    pub positive_only: bool,
}

impl MetricSpec {
    pub const fn higher(name: &'static str, weight: f64) -> Self {
        Self {
            name,
            weight,
            higher_is_better: true,
            cap: None,
            positive_only: false,
        }
    }

    pub const fn lower(name: &'static str, weight: f64) -> Self {
        Self {
            name,
            weight,
            higher_is_better: false,
            cap: None,
            positive_only: false,
        }
    }

    pub const fn capped(self, cap: f64) -> Self {
        Self {
            cap: Some(cap),
            ..self
        }
    }

    pub const fn positive_only(self) -> Self {
        Self {
            positive_only: true,
            ..self
        }
    }

    /// Clip a raw value to this metric's cap, if any.
    pub fn apply_cap(&self, value: f64) -> f64 {
        match self.cap {
            Some(cap) if value > cap => cap,
            _ => value,
        }
    }
}

/// Non-null count of one metric across the universe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCoverage {
    pub name: &'static str,
    pub present: usize,
    pub total: usize,
}

impl MetricCoverage {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.present as f64 / self.total as f64 * 100.0
    }
}

/// Data coverage of every metric in `specs`, logged at info.
pub fn coverage(stocks: &[StockRecord], specs: &[MetricSpec]) -> Vec<MetricCoverage> {
    tracing::info!("Data coverage:");
    specs
        .iter()
        .map(|spec| {
            let present = stocks.iter().filter(|s| s.metric(spec.name).is_some()).count();
            let c = MetricCoverage {
                name: spec.name,
                present,
                total: stocks.len(),
            };
            tracing::info!("  {}: {}/{} ({:.1}%)", c.name, c.present, c.total, c.percent());
            c
        })
        .collect()
}
