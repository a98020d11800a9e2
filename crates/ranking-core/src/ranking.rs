use crate::types::MarketCapCategory;
use std::cmp::Ordering;

/// Rank stocks 1..N within each tier by score, highest first.
///
/// Inputs are aligned by stock index. Ties (and missing scores, which sort
/// last) keep their input order. Stocks without a tier get `None`.
pub fn assign_tier_ranks(
    categories: &[Option<MarketCapCategory>],
    scores: &[Option<f64>],
) -> Vec<Option<u32>> {
    let mut ranks = vec![None; categories.len()];

    for tier in MarketCapCategory::ALL {
        let mut members: Vec<usize> = categories
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Some(tier))
            .map(|(i, _)| i)
            .collect();

        // Stable sort keeps input order on ties
        members.sort_by(|&a, &b| {
            let sa = scores.get(a).copied().flatten();
            let sb = scores.get(b).copied().flatten();
            match (sa, sb) {
                (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });

        for (position, idx) in members.into_iter().enumerate() {
            ranks[idx] = Some(position as u32 + 1);
        }
    }

    ranks
}
