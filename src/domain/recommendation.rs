//! Buy/sell/hold verdicts from the moving-average decision rule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::indicator::sma::simple_moving_average;
use crate::domain::performance::PerformanceReport;

pub const SHORT_WINDOW: usize = 10;
pub const LONG_WINDOW: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "Buy"),
            Action::Sell => write!(f, "Sell"),
            Action::Hold => write!(f, "Hold"),
        }
    }
}

/// The crossover rule, with the cost basis folded in.
///
/// More than 50 closes are required before any signal fires; below that the
/// verdict is always Hold. Both comparisons are strict, and the short/long
/// signals must agree with the price-versus-cost direction. Equal SMAs or
/// disagreeing signals fall through to Hold.
pub fn decision_rule(closes: &[f64], buy_price: f64) -> Action {
    if closes.len() <= LONG_WINDOW {
        return Action::Hold;
    }

    // Guarded by the length check above; both windows fit.
    let short_sma = simple_moving_average(closes, SHORT_WINDOW).unwrap_or(f64::NAN);
    let long_sma = simple_moving_average(closes, LONG_WINDOW).unwrap_or(f64::NAN);
    let current_price = closes[closes.len() - 1];

    if short_sma > long_sma && current_price > buy_price {
        Action::Buy
    } else if short_sma < long_sma && current_price < buy_price {
        Action::Sell
    } else {
        Action::Hold
    }
}

/// One verdict per holding, in report order.
pub fn generate(report: &PerformanceReport) -> Vec<(String, Action)> {
    report
        .holdings
        .iter()
        .map(|holding| {
            let closes: Vec<f64> = holding.bars.iter().map(|bar| bar.close).collect();
            (holding.ticker.clone(), decision_rule(&closes, holding.buy_price))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `count` closes ramping linearly from `start` by `step` per bar.
    fn ramp(start: f64, step: f64, count: usize) -> Vec<f64> {
        (0..count).map(|i| start + step * i as f64).collect()
    }

    #[test]
    fn short_series_is_hold() {
        let closes = ramp(100.0, 5.0, 20);
        assert_eq!(decision_rule(&closes, 1.0), Action::Hold);
    }

    #[test]
    fn exactly_fifty_bars_is_hold() {
        // Strongly rising and deep in profit, but the history floor wins.
        let closes = ramp(100.0, 10.0, 50);
        assert_eq!(decision_rule(&closes, 1.0), Action::Hold);
    }

    #[test]
    fn fifty_one_bars_can_signal() {
        let closes = ramp(100.0, 1.0, 51);
        assert_eq!(decision_rule(&closes, 1.0), Action::Buy);
    }

    #[test]
    fn rising_above_cost_is_buy() {
        // Uptrend: short SMA sits above long SMA, last close above cost.
        let closes = ramp(100.0, 1.0, 60);
        assert_eq!(decision_rule(&closes, 100.0), Action::Buy);
    }

    #[test]
    fn falling_below_cost_is_sell() {
        let closes = ramp(200.0, -1.0, 60);
        assert_eq!(decision_rule(&closes, 180.0), Action::Sell);
    }

    #[test]
    fn disagreeing_signals_hold() {
        // Downtrend (short < long) but the cost basis is below the last
        // close, so the sell leg does not fire.
        let closes = ramp(200.0, -1.0, 60);
        assert_eq!(decision_rule(&closes, 1.0), Action::Hold);

        // Uptrend but bought above the current price.
        let closes = ramp(100.0, 1.0, 60);
        assert_eq!(decision_rule(&closes, 1000.0), Action::Hold);
    }

    #[test]
    fn equal_smas_hold() {
        let closes = vec![100.0; 60];
        assert_eq!(decision_rule(&closes, 1.0), Action::Hold);
        assert_eq!(decision_rule(&closes, 1000.0), Action::Hold);
    }

    #[test]
    fn price_equal_to_cost_holds() {
        let mut closes = ramp(100.0, 1.0, 60);
        let last = *closes.last().unwrap();
        closes.push(last); // flatten the final step
        assert_eq!(decision_rule(&closes, last), Action::Hold);
    }

    #[test]
    fn action_display() {
        assert_eq!(Action::Buy.to_string(), "Buy");
        assert_eq!(Action::Sell.to_string(), "Sell");
        assert_eq!(Action::Hold.to_string(), "Hold");
    }
}
