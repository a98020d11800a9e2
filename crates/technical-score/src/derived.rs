//! Derived technical inputs computed from raw stock_data columns.

use ranking_core::StockRecord;

pub const PRICE: &str = "price";
pub const SMA_50: &str = "sma_50_1_day";
pub const SMA_200: &str = "sma_200_1_day";
pub const BOLLINGER_UPPER: &str = "bollinger_upper_20_1_day";
pub const BOLLINGER_BASIS: &str = "bollinger_basis_20_1_day";
pub const BOLLINGER_LOWER: &str = "bollinger_lower_20_1_day";
pub const MACD_LEVEL: &str = "macd_12_26_level_1_day";
pub const MACD_SIGNAL: &str = "macd_12_26_signal_1_day";

pub const SMA50_RELATIVE: &str = "sma50_relative";
pub const SMA200_RELATIVE: &str = "sma200_relative";
pub const BOLLINGER_UPPER_RELATIVE: &str = "bollinger_upper_relative";
pub const BOLLINGER_MIDDLE_RELATIVE: &str = "bollinger_middle_relative";
pub const BOLLINGER_LOWER_RELATIVE: &str = "bollinger_lower_relative";
pub const MACD_HISTOGRAM: &str = "macd_histogram";
pub const ANALYST_RATING_SCORE: &str = "analyst_rating_score";

/// Ordinal used when a rating is missing or unrecognised (Hold).
pub const DEFAULT_ANALYST_SCORE: f64 = 3.0;

/// Map a consensus rating label to a 1-5 ordinal.
pub fn analyst_rating_score(rating: Option<&str>) -> f64 {
    match rating.map(str::trim) {
        Some("Strong Buy") | Some("Strong buy") => 5.0,
        Some("Buy") => 4.0,
        Some("Hold") | Some("Neutral") => 3.0,
        Some("Sell") => 2.0,
        Some("Strong Sell") | Some("Strong sell") => 1.0,
        _ => DEFAULT_ANALYST_SCORE,
    }
}

/// Distance of a price level from the current price, as a fraction of price.
///
/// A zero price yields 0.0; a missing level or price yields `None`.
pub fn relative_to_price(level: Option<f64>, price: Option<f64>) -> Option<f64> {
    match (level, price) {
        (_, Some(p)) if p == 0.0 => Some(0.0),
        (Some(l), Some(p)) => Some((l - p) / p),
        _ => None,
    }
}

/// MACD line minus signal line, missing components counted as 0.
pub fn macd_histogram(level: Option<f64>, signal: Option<f64>) -> f64 {
    level.unwrap_or(0.0) - signal.unwrap_or(0.0)
}

/// New record with every derived input added to its metric map.
pub fn with_derived_metrics(stock: &StockRecord) -> StockRecord {
    let mut out = stock.clone();
    let price = stock.metric(PRICE);

    let relatives = [
        (SMA50_RELATIVE, SMA_50),
        (SMA200_RELATIVE, SMA_200),
        (BOLLINGER_UPPER_RELATIVE, BOLLINGER_UPPER),
        (BOLLINGER_MIDDLE_RELATIVE, BOLLINGER_BASIS),
        (BOLLINGER_LOWER_RELATIVE, BOLLINGER_LOWER),
    ];
    for (derived, source) in relatives {
        match relative_to_price(stock.metric(source), price) {
            Some(v) => {
                out.metrics.insert(derived.to_string(), v);
            }
            None => {
                out.metrics.remove(derived);
            }
        }
    }

    out.metrics.insert(
        MACD_HISTOGRAM.to_string(),
        macd_histogram(stock.metric(MACD_LEVEL), stock.metric(MACD_SIGNAL)),
    );
    out.metrics.insert(
        ANALYST_RATING_SCORE.to_string(),
        analyst_rating_score(stock.analyst_rating.as_deref()),
    );
    out
}
