use crate::derived::*;
use ranking_core::MetricSpec;

/// Importance weights of the technical composite.
///
/// Direction is not used by the z-score path: every metric contributes its
/// signed deviation from the peer mean.
pub const TECHNICAL_METRICS: &[MetricSpec] = &[
    MetricSpec::higher("rsi_14_1_day", 3.0),
    MetricSpec::higher("momentum_10_1_day", 3.0),
    MetricSpec::higher("roc_9_1_day", 3.0),
    MetricSpec::higher(MACD_LEVEL, 3.0),
    MetricSpec::higher("adx_14_1_day", 3.0),
    MetricSpec::higher("stochastic_k_14_3_3_1_day", 2.5),
    MetricSpec::higher("cci_20_1_day", 2.5),
    MetricSpec::higher(SMA50_RELATIVE, 2.0),
    MetricSpec::higher(SMA200_RELATIVE, 2.0),
    MetricSpec::higher(BOLLINGER_UPPER_RELATIVE, 2.0),
    MetricSpec::higher(BOLLINGER_MIDDLE_RELATIVE, 2.0),
    MetricSpec::higher(BOLLINGER_LOWER_RELATIVE, 2.0),
    MetricSpec::higher("chaikin_money_flow_20_1_day", 3.0),
    MetricSpec::higher("chaikin_money_flow_20_1_week", 2.0),
    MetricSpec::higher("chaikin_money_flow_20_1_month", 2.5),
    MetricSpec::higher(MACD_HISTOGRAM, 3.0),
    MetricSpec::higher("performance_ytd", 2.0),
    MetricSpec::higher("performance_1_year", 2.0),
    MetricSpec::higher("performance_6_months", 3.0),
    MetricSpec::higher("performance_3_months", 3.0),
    MetricSpec::higher("performance_1_month", 4.0),
    MetricSpec::higher("performance_1_week", 5.0),
    MetricSpec::higher(ANALYST_RATING_SCORE, 5.0),
    MetricSpec::higher("target_price_performance_1_year", 3.0),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_shape() {
        assert_eq!(TECHNICAL_METRICS.len(), 24);
        let names: HashSet<_> = TECHNICAL_METRICS.iter().map(|m| m.name).collect();
        assert_eq!(names.len(), 24);
        assert!(TECHNICAL_METRICS
            .iter()
            .all(|m| (2.0..=5.0).contains(&m.weight) && m.cap.is_none()));
    }
}
