use crate::parse::parse_numeric;
use ranking_core::stats::{min_max_normalize, round_to};
use serde::{Deserialize, Serialize};

/// Raw columns of a sector or industry performance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceColumn {
    MarketCap,
    ChangePct,
    Perf1W,
    Perf1M,
    Perf3M,
    Perf6M,
    PerfYtd,
    Perf1Y,
    Stocks,
}

impl PerformanceColumn {
    pub const ALL: [PerformanceColumn; 9] = [
        PerformanceColumn::MarketCap,
        PerformanceColumn::ChangePct,
        PerformanceColumn::Perf1W,
        PerformanceColumn::Perf1M,
        PerformanceColumn::Perf3M,
        PerformanceColumn::Perf6M,
        PerformanceColumn::PerfYtd,
        PerformanceColumn::Perf1Y,
        PerformanceColumn::Stocks,
    ];

    /// Column name in `sector_data` / `industry_data`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceColumn::MarketCap => "market_cap",
            PerformanceColumn::ChangePct => "change_pct",
            PerformanceColumn::Perf1W => "perf_1w",
            PerformanceColumn::Perf1M => "perf_1m",
            PerformanceColumn::Perf3M => "perf_3m",
            PerformanceColumn::Perf6M => "perf_6m",
            PerformanceColumn::PerfYtd => "perf_ytd",
            PerformanceColumn::Perf1Y => "perf_1y",
            PerformanceColumn::Stocks => "stocks",
        }
    }

    fn position(&self) -> usize {
        *self as usize
    }
}

/// Holding horizon a momentum score is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Horizon {
    ThreeMonth,
    SixMonth,
    OneYear,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::ThreeMonth, Horizon::SixMonth, Horizon::OneYear];

    /// Points given to a normalized column on this horizon.
    pub fn weight(&self, column: PerformanceColumn) -> f64 {
        use PerformanceColumn::*;
        match (self, column) {
            (Horizon::ThreeMonth, ChangePct) => 20.0,
            (Horizon::ThreeMonth, Perf1W) => 10.0,
            (Horizon::ThreeMonth, Perf1M) => 20.0,
            (Horizon::ThreeMonth, Perf3M) => 30.0,
            (Horizon::ThreeMonth, Perf6M) => 10.0,
            (Horizon::ThreeMonth, PerfYtd) => 5.0,
            (Horizon::ThreeMonth, Perf1Y) => 5.0,
            (Horizon::ThreeMonth, MarketCap | Stocks) => 0.0,

            (Horizon::SixMonth, ChangePct) => 15.0,
            (Horizon::SixMonth, Perf1W) => 8.0,
            (Horizon::SixMonth, Perf1M) => 15.0,
            (Horizon::SixMonth, Perf3M) => 20.0,
            (Horizon::SixMonth, Perf6M) => 25.0,
            (Horizon::SixMonth, PerfYtd) => 10.0,
            (Horizon::SixMonth, Perf1Y) => 7.0,
            (Horizon::SixMonth, MarketCap | Stocks) => 0.0,

            (Horizon::OneYear, ChangePct) => 10.0,
            (Horizon::OneYear, Perf1W) => 5.0,
            (Horizon::OneYear, Perf1M) => 10.0,
            (Horizon::OneYear, Perf3M) => 15.0,
            (Horizon::OneYear, Perf6M) => 20.0,
            (Horizon::OneYear, PerfYtd) => 10.0,
            (Horizon::OneYear, Perf1Y) => 15.0,
            (Horizon::OneYear, MarketCap) => 10.0,
            (Horizon::OneYear, Stocks) => 5.0,
        }
    }
}

/// One row of a performance table, cleaned to numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPerformance {
    pub name: String,
    values: [Option<f64>; 9],
}

impl GroupPerformance {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: [None; 9],
        }
    }

    pub fn with(mut self, column: PerformanceColumn, value: f64) -> Self {
        self.values[column.position()] = Some(value).filter(|v| v.is_finite());
        self
    }

    /// Build from scraped strings; unparsable cells become missing.
    pub fn from_raw<'a>(
        name: impl Into<String>,
        raw: impl IntoIterator<Item = (PerformanceColumn, Option<&'a str>)>,
    ) -> Self {
        let mut row = Self::new(name);
        for (column, text) in raw {
            row.values[column.position()] = text.and_then(parse_numeric);
        }
        row
    }

    pub fn get(&self, column: PerformanceColumn) -> Option<f64> {
        self.values[column.position()]
    }
}

/// Momentum scores of one sector or industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMomentumScore {
    pub name: String,
    pub score_3m: Option<f64>,
    pub score_6m: Option<f64>,
    pub score_1y: Option<f64>,
}

impl GroupMomentumScore {
    pub fn get(&self, horizon: Horizon) -> Option<f64> {
        match horizon {
            Horizon::ThreeMonth => self.score_3m,
            Horizon::SixMonth => self.score_6m,
            Horizon::OneYear => self.score_1y,
        }
    }
}

/// Score every group against the others in the same table.
///
/// Each column is min-max normalized over all rows (a flat column gives 1.0
/// to everyone). A horizon score is the weighted sum of the normalized
/// columns, rounded to 4 decimals; it is `None` if any column is missing
/// for that row.
pub fn score_groups(rows: &[GroupPerformance]) -> Vec<GroupMomentumScore> {
    let normalized: Vec<Vec<Option<f64>>> = PerformanceColumn::ALL
        .iter()
        .map(|col| {
            let column: Vec<Option<f64>> = rows.iter().map(|r| r.get(*col)).collect();
            min_max_normalize(&column)
        })
        .collect();

    let horizon_score = |row: usize, horizon: Horizon| -> Option<f64> {
        let mut total = 0.0;
        for (col_idx, column) in PerformanceColumn::ALL.iter().enumerate() {
            total += normalized[col_idx][row]? * horizon.weight(*column);
        }
        Some(round_to(total, 4))
    };

    rows.iter()
        .enumerate()
        .map(|(i, row)| GroupMomentumScore {
            name: row.name.clone(),
            score_3m: horizon_score(i, Horizon::ThreeMonth),
            score_6m: horizon_score(i, Horizon::SixMonth),
            score_1y: horizon_score(i, Horizon::OneYear),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use PerformanceColumn::*;

    fn full_row(name: &str, base: f64) -> GroupPerformance {
        PerformanceColumn::ALL
            .iter()
            .fold(GroupPerformance::new(name), |row, col| row.with(*col, base))
    }

    #[test]
    fn test_horizon_weights_total() {
        let totals: Vec<f64> = Horizon::ALL
            .iter()
            .map(|h| PerformanceColumn::ALL.iter().map(|c| h.weight(*c)).sum())
            .collect();
        assert_eq!(totals, vec![100.0, 100.0, 100.0]);
    }

    #[test]
    fn test_best_and_worst_group() {
        let rows = vec![full_row("Weak", 1.0), full_row("Mid", 2.0), full_row("Strong", 3.0)];
        let scores = score_groups(&rows);
        assert_eq!(scores[0].score_3m, Some(0.0));
        assert_eq!(scores[1].score_6m, Some(50.0));
        assert_eq!(scores[2].score_1y, Some(100.0));
    }

    #[test]
    fn test_flat_column_scores_one() {
        let rows = vec![
            full_row("A", 1.0).with(Stocks, 7.0),
            full_row("B", 2.0).with(Stocks, 7.0),
        ];
        let scores = score_groups(&rows);
        // stocks is flat (1.0 each, weight 5 on 1y); A is 0 elsewhere
        assert_eq!(scores[0].score_1y, Some(5.0));
        assert_eq!(scores[0].score_3m, Some(0.0));
    }

    #[test]
    fn test_flat_column_fills_missing_cells() {
        let mut b = full_row("B", 2.0);
        b.values[Stocks.position()] = None;
        let scores = score_groups(&[full_row("A", 1.0).with(Stocks, 7.0), b]);
        assert_eq!(scores[0].score_1y, Some(5.0));
        assert_eq!(scores[1].score_1y, Some(100.0));
        assert_eq!(scores[1].score_3m, Some(100.0));
    }

    #[test]
    fn test_missing_cell_nulls_the_row() {
        let mut gap = full_row("Gap", 2.0);
        gap.values[MarketCap.position()] = None;
        let scores = score_groups(&[full_row("A", 1.0), gap, full_row("C", 3.0)]);
        assert_eq!(scores[1].score_3m, None);
        assert_eq!(scores[1].score_1y, None);
        assert_eq!(scores[0].score_3m, Some(0.0));
    }

    #[test]
    fn test_from_raw_strings() {
        let row = GroupPerformance::from_raw(
            "Energy Minerals",
            vec![
                (MarketCap, Some("1,204.3 B INR")),
                (ChangePct, Some("\u{2212}1.2%")),
                (Perf1W, Some("+3%")),
                (Stocks, None),
            ],
        );
        assert_eq!(row.get(MarketCap), Some(1204.3));
        assert_eq!(row.get(ChangePct), Some(-1.2));
        assert_eq!(row.get(Perf1W), Some(3.0));
        assert_eq!(row.get(Stocks), None);
    }
}
