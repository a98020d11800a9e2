/// Statistical helpers shared by both scoring pipelines.
///
/// Everything here is a pure function over slices so that peer-group
/// statistics can be computed once per group and reused for every member.

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Compute sample standard deviation (n - 1 denominator).
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let variance = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    variance.sqrt()
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Rank-based percentile (0.0 to 100.0) of `value` within `peers`.
///
/// Counts peers strictly worse than `value`: smaller when `higher_is_better`,
/// larger otherwise. Ties land on neither side. Not interpolated.
pub fn strict_percentile(value: f64, peers: &[f64], higher_is_better: bool) -> f64 {
    if peers.is_empty() {
        return 50.0;
    }
    let worse = if higher_is_better {
        peers.iter().filter(|&&p| p < value).count()
    } else {
        peers.iter().filter(|&&p| p > value).count()
    };
    worse as f64 / peers.len() as f64 * 100.0
}

/// Min-max scale each present value into [0, 1].
///
/// When every present value is equal the whole column maps to 1.0,
/// missing cells included. Otherwise missing values stay missing.
pub fn min_max_normalize(data: &[Option<f64>]) -> Vec<Option<f64>> {
    let present: Vec<f64> = data.iter().flatten().copied().collect();
    if present.is_empty() {
        return vec![None; data.len()];
    }
    let min = present.iter().copied().fold(f64::INFINITY, f64::min);
    let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return vec![Some(1.0); data.len()];
    }
    data.iter()
        .map(|v| v.map(|x| (x - min) / (max - min)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_std_dev() {
        let data = vec![30.0, 50.0, 70.0];
        assert!((mean(&data) - 50.0).abs() < 1e-12);
        assert!((std_dev(&data) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_std_dev_needs_two_points() {
        assert_eq!(std_dev(&[4.2]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(-2.675001, 2), -2.68);
        assert_eq!(round_to(0.123456, 4), 0.1235);
    }

    #[test]
    fn test_strict_percentile_direction() {
        let peers = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(strict_percentile(4.0, &peers, true), 75.0);
        assert_eq!(strict_percentile(1.0, &peers, true), 0.0);
        // Lower is better: 1.0 beats three peers
        assert_eq!(strict_percentile(1.0, &peers, false), 75.0);
    }

    #[test]
    fn test_strict_percentile_ties_count_nowhere() {
        let peers = vec![5.0, 5.0, 5.0];
        assert_eq!(strict_percentile(5.0, &peers, true), 0.0);
        assert_eq!(strict_percentile(5.0, &peers, false), 0.0);
    }

    #[test]
    fn test_min_max_normalize() {
        let out = min_max_normalize(&[Some(0.0), Some(5.0), None, Some(10.0)]);
        assert_eq!(out, vec![Some(0.0), Some(0.5), None, Some(1.0)]);
        assert_eq!(min_max_normalize(&[None, None]), vec![None, None]);
    }

    #[test]
    fn test_min_max_flat_column() {
        let out = min_max_normalize(&[Some(3.0), Some(3.0), None]);
        assert_eq!(out, vec![Some(1.0), Some(1.0), Some(1.0)]);
    }
}
