//! Volume-weighted average price.

use crate::domain::indicator::IndicatorError;
use crate::domain::ohlcv::PriceBar;

/// Σ(average_price · volume) / Σ(volume), where average_price is the
/// four-way OHLC mean of each bar.
pub fn volume_weighted_average_price(bars: &[PriceBar]) -> Result<f64, IndicatorError> {
    let total_volume: i64 = bars.iter().map(|bar| bar.volume).sum();
    if total_volume == 0 {
        return Err(IndicatorError::ZeroVolume);
    }

    let weighted: f64 = bars
        .iter()
        .map(|bar| bar.average_price() * bar.volume as f64)
        .sum();

    Ok(weighted / total_volume as f64)
}
