//! Simple moving average.

use crate::domain::indicator::IndicatorError;

/// Mean of the last `window` values.
///
/// Callers wanting the whole rolling series use [`sma_series`]; this returns
/// only the most recent value.
pub fn simple_moving_average(values: &[f64], window: usize) -> Result<f64, IndicatorError> {
    if window == 0 || values.len() < window {
        return Err(IndicatorError::WindowTooLarge {
            have: values.len(),
            need: window.max(1),
        });
    }
    let tail = &values[values.len() - window..];
    Ok(tail.iter().sum::<f64>() / window as f64)
}

/// Rolling SMA aligned with the input; the first `window - 1` slots are
/// `None` (warmup).
pub fn sma_series(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                None
            } else {
                let slice = &values[i + 1 - window..=i];
                Some(slice.iter().sum::<f64>() / window as f64)
            }
        })
        .collect()
}
