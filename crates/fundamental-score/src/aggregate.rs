use crate::metrics::Category;
use ranking_core::stats::round_to;
use ranking_core::MetricSpec;
use std::collections::BTreeMap;

/// Score substituted for a category with no usable metric.
pub const NEUTRAL_CATEGORY_SCORE: f64 = 50.0;

/// Weighted mean of the percentiles present for one category.
///
/// Weights of the present metrics are rescaled to sum to 1. Returns `None`
/// when none of the category's metrics has a percentile.
pub fn category_score(percentiles: &BTreeMap<String, f64>, metrics: &[MetricSpec]) -> Option<f64> {
    let present: Vec<(f64, f64)> = metrics
        .iter()
        .filter_map(|spec| {
            percentiles
                .get(spec.name)
                .filter(|p| p.is_finite())
                .map(|p| (*p, spec.weight))
        })
        .collect();
    if present.is_empty() {
        return None;
    }
    let total_weight: f64 = present.iter().map(|(_, w)| w).sum();
    if total_weight <= 0.0 {
        return None;
    }
    let weighted: f64 = present.iter().map(|(p, w)| p * w / total_weight).sum();
    Some(round_to(weighted, 2))
}

/// Category scores keyed by category.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryScores {
    pub quality: Option<f64>,
    pub growth: Option<f64>,
    pub valuation: Option<f64>,
    pub health: Option<f64>,
}

impl CategoryScores {
    pub fn from_percentiles(percentiles: &BTreeMap<String, f64>) -> Self {
        Self {
            quality: category_score(percentiles, Category::Quality.metrics()),
            growth: category_score(percentiles, Category::Growth.metrics()),
            valuation: category_score(percentiles, Category::Valuation.metrics()),
            health: category_score(percentiles, Category::Health.metrics()),
        }
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        match category {
            Category::Quality => self.quality,
            Category::Growth => self.growth,
            Category::Valuation => self.valuation,
            Category::Health => self.health,
        }
    }

    /// Blend into the 0-100 composite; missing categories count as neutral.
    pub fn composite(&self) -> f64 {
        let total: f64 = Category::ALL
            .iter()
            .map(|c| self.get(*c).unwrap_or(NEUTRAL_CATEGORY_SCORE) * c.blend_weight())
            .sum();
        round_to(total, 2)
    }
}
