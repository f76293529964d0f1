//! CSV-directory market data adapter.
//!
//! One `<TICKER>.csv` per symbol with a `date,open,high,low,close,volume`
//! header. This is the offline stand-in for a live quote provider; anything
//! implementing [`MarketDataPort`] can replace it.

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::domain::error::StocklensError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::MarketDataPort;

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn parse_field(
        record: &csv::StringRecord,
        index: usize,
        name: &str,
        ticker: &str,
    ) -> Result<f64, StocklensError> {
        record
            .get(index)
            .ok_or_else(|| StocklensError::PriceData {
                ticker: ticker.to_string(),
                reason: format!("missing {} column", name),
            })?
            .parse()
            .map_err(|e| StocklensError::PriceData {
                ticker: ticker.to_string(),
                reason: format!("invalid {} value: {}", name, e),
            })
    }
}

impl MarketDataPort for CsvDataAdapter {
    fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, StocklensError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|_| StocklensError::DataNotFound {
            ticker: ticker.to_string(),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| StocklensError::PriceData {
                ticker: ticker.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| StocklensError::PriceData {
                ticker: ticker.to_string(),
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                StocklensError::PriceData {
                    ticker: ticker.to_string(),
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if date < start || date > end {
                continue;
            }

            let open = Self::parse_field(&record, 1, "open", ticker)?;
            let high = Self::parse_field(&record, 2, "high", ticker)?;
            let low = Self::parse_field(&record, 3, "low", ticker)?;
            let close = Self::parse_field(&record, 4, "close", ticker)?;
            let volume: i64 = record
                .get(5)
                .ok_or_else(|| StocklensError::PriceData {
                    ticker: ticker.to_string(),
                    reason: "missing volume column".into(),
                })?
                .parse()
                .map_err(|e| StocklensError::PriceData {
                    ticker: ticker.to_string(),
                    reason: format!("invalid volume value: {}", e),
                })?;

            bars.push(PriceBar {
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|bar| bar.date);
        Ok(bars)
    }
}
