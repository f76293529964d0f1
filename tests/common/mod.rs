#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;

use stocklens::domain::error::StocklensError;
pub use stocklens::domain::ohlcv::PriceBar;
use stocklens::domain::performance::{HoldingPerformance, PerformanceReport};
use stocklens::domain::recommendation::Action;
use stocklens::ports::data_port::MarketDataPort;
use stocklens::ports::report_port::ReportPort;

pub struct MockMarketData {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketData {
    fn fetch_daily(
        &self,
        ticker: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<PriceBar>, StocklensError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(StocklensError::PriceData {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        match self.data.get(ticker) {
            Some(bars) => Ok(bars.clone()),
            None => Err(StocklensError::DataNotFound {
                ticker: ticker.to_string(),
            }),
        }
    }
}

/// Report port that swallows everything; for tests that only exercise the
/// numbers.
pub struct NullReport;

impl ReportPort for NullReport {
    fn prepare(&self) -> Result<(), StocklensError> {
        Ok(())
    }

    fn render_chart(&self, _holding: &HoldingPerformance) -> Result<(), StocklensError> {
        Ok(())
    }

    fn write_report(
        &self,
        _report: &PerformanceReport,
        _recommendations: &[(String, Action)],
        _report_name: &str,
    ) -> Result<(), StocklensError> {
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> PriceBar {
    PriceBar {
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// `count` consecutive daily bars whose closes follow `close_fn(i)`.
pub fn generate_bars(start_date: &str, count: usize, close_fn: impl Fn(usize) -> f64) -> Vec<PriceBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| {
            let close = close_fn(i);
            PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open: close - 1.0,
                high: close + 1.0,
                low: close - 2.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Flat-price series of `count` bars closing at `price`.
pub fn flat_bars(start_date: &str, count: usize, price: f64) -> Vec<PriceBar> {
    generate_bars(start_date, count, move |_| price)
}
