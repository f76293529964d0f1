//! A single portfolio holding and its owned price history.

use chrono::NaiveDate;

use crate::domain::ohlcv::PriceBar;

/// Invariant: `bars` is non-empty and ascending by date. An empty fetch is a
/// data-not-found failure upstream, never a zero-value position.
#[derive(Debug, Clone)]
pub struct Position {
    pub ticker: String,
    pub buy_date: NaiveDate,
    pub buy_price: f64,
    pub quantity: i64,
    pub bars: Vec<PriceBar>,
}

impl Position {
    /// Last close in the owned series.
    pub fn current_price(&self) -> f64 {
        self.bars
            .last()
            .map(|bar| bar.close)
            .unwrap_or(self.buy_price)
    }

    pub fn cost_basis(&self) -> f64 {
        self.buy_price * self.quantity as f64
    }

    pub fn market_value(&self) -> f64 {
        self.current_price() * self.quantity as f64
    }

    pub fn profit_loss(&self) -> f64 {
        (self.current_price() - self.buy_price) * self.quantity as f64
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }
}
