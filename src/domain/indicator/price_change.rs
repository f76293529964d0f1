//! Intraday price change percentage.

use crate::domain::ohlcv::PriceBar;

/// Per bar, (close - open) / open.
pub fn price_change_percent(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter()
        .map(|bar| (bar.close - bar.open) / bar.open)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bar(day: u32, open: f64, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume: 1000,
        }
    }

    #[test]
    fn gain_day() {
        let bars = vec![make_bar(1, 100.0, 110.0)];
        let changes = price_change_percent(&bars);
        assert!((changes[0] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn loss_day() {
        let bars = vec![make_bar(1, 200.0, 190.0)];
        let changes = price_change_percent(&bars);
        assert!((changes[0] - (-0.05)).abs() < 1e-12);
    }

    #[test]
    fn flat_day_is_zero() {
        let bars = vec![make_bar(1, 50.0, 50.0)];
        let changes = price_change_percent(&bars);
        assert_eq!(changes[0], 0.0);
    }

    #[test]
    fn one_value_per_bar() {
        let bars = vec![
            make_bar(1, 100.0, 101.0),
            make_bar(2, 101.0, 99.0),
            make_bar(3, 99.0, 103.0),
        ];
        assert_eq!(price_change_percent(&bars).len(), 3);
    }

    #[test]
    fn empty_series() {
        assert!(price_change_percent(&[]).is_empty());
    }
}
