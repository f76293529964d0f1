//! Relative strength proxy.
//!
//! Bars are bucketed by the sign of (close - open); a bar that closes where
//! it opened counts as a down bar. RS is the ratio of mean up-close to mean
//! down-close, and the result is 100 - 100/(1 + RS). This uses raw closing
//! prices and same-day direction, not day-over-day deltas.

use crate::domain::indicator::IndicatorError;
use crate::domain::ohlcv::PriceBar;

pub fn rsi_proxy(bars: &[PriceBar]) -> Result<f64, IndicatorError> {
    let mut up_closes: Vec<f64> = Vec::new();
    let mut down_closes: Vec<f64> = Vec::new();

    for bar in bars {
        if bar.close - bar.open > 0.0 {
            up_closes.push(bar.close);
        } else {
            down_closes.push(bar.close);
        }
    }

    if up_closes.is_empty() {
        return Err(IndicatorError::EmptyBucket {
            direction: "up".into(),
        });
    }
    if down_closes.is_empty() {
        return Err(IndicatorError::EmptyBucket {
            direction: "down".into(),
        });
    }

    let avg_up = up_closes.iter().sum::<f64>() / up_closes.len() as f64;
    let avg_down = down_closes.iter().sum::<f64>() / down_closes.len() as f64;
    let relative_strength = avg_up / avg_down;

    Ok(100.0 - (100.0 / (1.0 + relative_strength)))
}
