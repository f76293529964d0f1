//! Price series metrics.
//!
//! Pure functions over a slice of [`PriceBar`]s. Degenerate arithmetic
//! (zero total volume, an empty RSI bucket, a flat PE bar) surfaces as
//! [`IndicatorError`] instead of letting NaN or infinity leak into results.

pub mod pe_ratio;
pub mod price_change;
pub mod rsi;
pub mod sma;
pub mod true_range;
pub mod vwap;

use chrono::NaiveDate;

use crate::domain::ohlcv::PriceBar;

/// Degenerate-arithmetic and insufficient-data conditions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorError {
    #[error("insufficient data: have {have} values, need {need}")]
    WindowTooLarge { have: usize, need: usize },

    #[error("total volume is zero, VWAP is undefined")]
    ZeroVolume,

    #[error("no {direction} bars in series, RSI is undefined")]
    EmptyBucket { direction: String },

    #[error("close equals open on {date}, PE ratio is undefined")]
    FlatBar { date: NaiveDate },
}

/// Results of running every metric over one series.
///
/// A failure in one metric never suppresses the others: the fallible
/// metrics carry their own `Result`, the per-bar series are infallible.
#[derive(Debug, Clone)]
pub struct IndicatorReport {
    pub price_change: Vec<f64>,
    pub true_range: Vec<f64>,
    pub vwap: Result<f64, IndicatorError>,
    pub rsi: Result<f64, IndicatorError>,
    pub pe_ratio: Result<Vec<f64>, IndicatorError>,
}

pub fn calculate_all(bars: &[PriceBar]) -> IndicatorReport {
    IndicatorReport {
        price_change: price_change::price_change_percent(bars),
        true_range: true_range::true_range_series(bars),
        vwap: vwap::volume_weighted_average_price(bars),
        rsi: rsi::rsi_proxy(bars),
        pe_ratio: pe_ratio::pe_ratio_proxy(bars),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar(day: u32, open: f64, close: f64, volume: i64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open,
            high: open.max(close) + 1.0,
            low: open.min(close) - 1.0,
            close,
            volume,
        }
    }

    #[test]
    fn calculate_all_collects_everything_on_clean_data() {
        let bars = vec![
            make_bar(1, 100.0, 105.0, 1000),
            make_bar(2, 105.0, 102.0, 1200),
            make_bar(3, 102.0, 108.0, 900),
        ];
        let report = calculate_all(&bars);

        assert_eq!(report.price_change.len(), 3);
        assert_eq!(report.true_range.len(), 3);
        assert!(report.vwap.is_ok());
        assert!(report.rsi.is_ok());
        assert!(report.pe_ratio.is_ok());
    }

    #[test]
    fn one_degenerate_metric_does_not_suppress_the_others() {
        // Zero volume kills VWAP only; the rest still compute.
        let bars = vec![make_bar(1, 100.0, 105.0, 0), make_bar(2, 105.0, 102.0, 0)];
        let report = calculate_all(&bars);

        assert_eq!(report.vwap, Err(IndicatorError::ZeroVolume));
        assert!(report.rsi.is_ok());
        assert!(report.pe_ratio.is_ok());
        assert_eq!(report.price_change.len(), 2);
    }
}
