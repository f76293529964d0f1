//! The portfolio ledger.
//!
//! Positions are kept in insertion order; re-adding a ticker overwrites the
//! prior position in place. A position only enters the ledger once its price
//! history has been fetched, so no partial positions are ever observable.

use chrono::NaiveDate;

use crate::domain::error::StocklensError;
use crate::domain::indicator::sma::sma_series;
use crate::domain::performance::{HoldingPerformance, PerformanceReport, PerformanceTotals};
use crate::domain::position::Position;
use crate::domain::recommendation::{LONG_WINDOW, SHORT_WINDOW};
use crate::ports::data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

/// One validated entry of a portfolio document, before its history is
/// fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioEntry {
    pub ticker: String,
    pub buy_date: NaiveDate,
    pub buy_price: f64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default)]
pub struct Portfolio {
    positions: Vec<Position>,
}

impl Portfolio {
    pub fn new() -> Self {
        Portfolio {
            positions: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, ticker: &str) -> Option<&Position> {
        self.positions.iter().find(|pos| pos.ticker == ticker)
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Validate the entry, fetch [buy_date, as_of] through the data port,
    /// and insert. On any failure the ledger is left unchanged.
    pub fn add_position(
        &mut self,
        data: &dyn MarketDataPort,
        ticker: &str,
        buy_date: NaiveDate,
        buy_price: f64,
        quantity: i64,
        as_of: NaiveDate,
    ) -> Result<(), StocklensError> {
        if ticker.trim().is_empty() {
            return Err(StocklensError::validation("ticker", "must not be empty"));
        }
        if buy_date > as_of {
            return Err(StocklensError::validation(
                "buy_date",
                "must not be in the future",
            ));
        }
        if buy_price <= 0.0 {
            return Err(StocklensError::validation("buy_price", "must be positive"));
        }
        if quantity <= 0 {
            return Err(StocklensError::validation("quantity", "must be positive"));
        }

        let ticker = ticker.trim().to_uppercase();
        let bars = data.fetch_daily(&ticker, buy_date, as_of)?;
        if bars.is_empty() {
            return Err(StocklensError::DataNotFound { ticker });
        }

        let position = Position {
            ticker: ticker.clone(),
            buy_date,
            buy_price,
            quantity,
            bars,
        };

        // Last write wins; the original insertion slot is kept.
        match self.positions.iter_mut().find(|pos| pos.ticker == ticker) {
            Some(existing) => *existing = position,
            None => self.positions.push(position),
        }
        Ok(())
    }

    /// Build a portfolio from pre-validated entries, atomically: a failure
    /// on any entry aborts the whole load and nothing is returned.
    pub fn load(
        data: &dyn MarketDataPort,
        entries: &[PortfolioEntry],
        as_of: NaiveDate,
    ) -> Result<Portfolio, StocklensError> {
        let mut portfolio = Portfolio::new();
        for entry in entries {
            portfolio.add_position(
                data,
                &entry.ticker,
                entry.buy_date,
                entry.buy_price,
                entry.quantity,
                as_of,
            )?;
        }
        Ok(portfolio)
    }

    /// Snapshot every holding's valuation and the aggregate totals,
    /// rendering the moving-averages chart for each holding on the way.
    pub fn compute_performance(
        &self,
        charts: &dyn ReportPort,
    ) -> Result<PerformanceReport, StocklensError> {
        let mut holdings = Vec::with_capacity(self.positions.len());
        let mut totals = PerformanceTotals::default();

        for position in &self.positions {
            let closes = position.closes();
            let holding = HoldingPerformance {
                ticker: position.ticker.clone(),
                buy_price: position.buy_price,
                current_price: position.current_price(),
                quantity: position.quantity,
                profit_loss: position.profit_loss(),
                bars: position.bars.clone(),
                sma_10: sma_series(&closes, SHORT_WINDOW),
                sma_50: sma_series(&closes, LONG_WINDOW),
            };

            charts.render_chart(&holding)?;

            totals.total_investment += position.cost_basis();
            totals.total_value += position.market_value();
            holdings.push(holding);
        }

        totals.total_profit_loss = totals.total_value - totals.total_investment;
        Ok(PerformanceReport { holdings, totals })
    }
}
