//! Per-bar true range.
//!
//! Element 0 is high - low; every later element is
//! max(high - low, |high - prev_close|, |low - prev_close|). No smoothing
//! is applied, so this is the raw true range series rather than a rolling
//! average.

use crate::domain::ohlcv::PriceBar;

pub fn true_range_series(bars: &[PriceBar]) -> Vec<f64> {
    let mut values = Vec::with_capacity(bars.len());
    let mut prev_close: Option<f64> = None;

    for bar in bars {
        let tr = match prev_close {
            None => bar.high - bar.low,
            Some(prev) => bar.true_range(prev),
        };
        values.push(tr);
        prev_close = Some(bar.close);
    }

    values
}
