use ranking_core::MetricSpec;
use serde::{Deserialize, Serialize};

pub const QUALITY_METRICS: &[MetricSpec] = &[
    MetricSpec::higher("return_on_equity_ttm", 0.12),
    MetricSpec::higher("return_on_invested_capital_ttm", 0.10),
    MetricSpec::higher("operating_margin_ttm", 0.08),
    MetricSpec::higher("net_margin_ttm", 0.06),
    MetricSpec::higher("gross_margin_annual", 0.04),
];

pub const GROWTH_METRICS: &[MetricSpec] = &[
    MetricSpec::higher("eps_diluted_growth_ttm_yoy", 0.10),
    MetricSpec::higher("revenue_growth_annual_yoy", 0.08),
    MetricSpec::higher("eps_diluted_growth_annual_yoy", 0.06),
    MetricSpec::higher("net_income_growth_annual_yoy", 0.06),
];

/// Lower multiples are better; a non-positive multiple means losses.
pub const VALUATION_METRICS: &[MetricSpec] = &[
    MetricSpec::lower("pe_ratio", 0.07).positive_only(),
    MetricSpec::lower("price_to_earnings_growth_ttm", 0.05).positive_only(),
    MetricSpec::lower("enterprise_value_to_ebitda_ttm", 0.04).positive_only(),
    MetricSpec::lower("price_to_book_ratio", 0.02).positive_only(),
    MetricSpec::lower("price_to_sales_ratio", 0.02).positive_only(),
];

pub const HEALTH_METRICS: &[MetricSpec] = &[
    MetricSpec::higher("current_ratio_quarterly", 0.03).capped(3.0),
    MetricSpec::lower("debt_to_equity_ratio_quarterly", 0.03),
    MetricSpec::higher("quick_ratio_quarterly", 0.02).capped(2.0),
    MetricSpec::higher("ebitda_interest_coverage_ttm", 0.02).capped(10.0),
];

/// The four blended groups of the fundamental composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Quality,
    Growth,
    Valuation,
    Health,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Quality,
        Category::Growth,
        Category::Valuation,
        Category::Health,
    ];

    pub fn metrics(&self) -> &'static [MetricSpec] {
        match self {
            Category::Quality => QUALITY_METRICS,
            Category::Growth => GROWTH_METRICS,
            Category::Valuation => VALUATION_METRICS,
            Category::Health => HEALTH_METRICS,
        }
    }

    /// Share of this category in the fundamental composite.
    pub fn blend_weight(&self) -> f64 {
        match self {
            Category::Quality => 0.40,
            Category::Growth => 0.30,
            Category::Valuation => 0.20,
            Category::Health => 0.10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Quality => "quality",
            Category::Growth => "growth",
            Category::Valuation => "valuation",
            Category::Health => "health",
        }
    }
}

/// Every scored metric, category by category.
pub fn all_metrics() -> Vec<MetricSpec> {
    Category::ALL
        .iter()
        .flat_map(|c| c.metrics().iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_weights_sum_to_blend() {
        for category in Category::ALL {
            let total: f64 = category.metrics().iter().map(|m| m.weight).sum();
            assert!((total - category.blend_weight()).abs() < 1e-9);
        }
        let blend: f64 = Category::ALL.iter().map(|c| c.blend_weight()).sum();
        assert!((blend - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_valuation_metrics_are_positive_only() {
        assert!(VALUATION_METRICS
            .iter()
            .all(|m| m.positive_only && !m.higher_is_better));
        assert_eq!(all_metrics().len(), 18);
    }
}
