//! Price-to-earnings proxy.
//!
//! Per bar, average_price / (close - open). A same-day ratio with no
//! earnings data behind it; a bar where close equals open makes the
//! denominator collapse and fails the whole calculation.

use crate::domain::indicator::IndicatorError;
use crate::domain::ohlcv::PriceBar;

pub fn pe_ratio_proxy(bars: &[PriceBar]) -> Result<Vec<f64>, IndicatorError> {
    let mut values = Vec::with_capacity(bars.len());

    for bar in bars {
        let spread = bar.close - bar.open;
        if spread == 0.0 {
            return Err(IndicatorError::FlatBar { date: bar.date });
        }
        values.push(bar.average_price() / spread);
    }

    Ok(values)
}
