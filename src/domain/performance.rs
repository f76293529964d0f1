//! Derived performance snapshot types.
//!
//! A report is recomputed fresh on every request and passed by value; it is
//! never cached on the ledger.

use serde::{Deserialize, Serialize};

use crate::domain::ohlcv::PriceBar;

/// One holding's slice of the report, with the SMA columns prepared for
/// charting and report output.
#[derive(Debug, Clone)]
pub struct HoldingPerformance {
    pub ticker: String,
    pub buy_price: f64,
    pub current_price: f64,
    pub quantity: i64,
    pub profit_loss: f64,
    pub bars: Vec<PriceBar>,
    pub sma_10: Vec<Option<f64>>,
    pub sma_50: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTotals {
    pub total_investment: f64,
    pub total_value: f64,
    pub total_profit_loss: f64,
}

#[derive(Debug, Clone)]
pub struct PerformanceReport {
    pub holdings: Vec<HoldingPerformance>,
    pub totals: PerformanceTotals,
}

/// Mean of each numeric column across the whole series. SMA means skip
/// warmup slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnAverages {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub sma_10: Option<f64>,
    pub sma_50: Option<f64>,
}

impl HoldingPerformance {
    pub fn column_averages(&self) -> ColumnAverages {
        let n = self.bars.len() as f64;
        let sum = |f: fn(&PriceBar) -> f64| self.bars.iter().map(f).sum::<f64>();

        ColumnAverages {
            open: sum(|b| b.open) / n,
            high: sum(|b| b.high) / n,
            low: sum(|b| b.low) / n,
            close: sum(|b| b.close) / n,
            volume: self.bars.iter().map(|b| b.volume as f64).sum::<f64>() / n,
            sma_10: mean_of_present(&self.sma_10),
            sma_50: mean_of_present(&self.sma_50),
        }
    }
}

fn mean_of_present(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}
