//! Market data access port trait.

use chrono::NaiveDate;

use crate::domain::error::StocklensError;
use crate::domain::ohlcv::PriceBar;

/// Daily price history for one ticker over an inclusive date range.
///
/// Implementations return bars ascending by date and fail with
/// [`StocklensError::DataNotFound`] when the ticker is unknown; an empty but
/// "successful" answer is indistinguishable from no data and callers treat
/// it the same way.
pub trait MarketDataPort {
    fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, StocklensError>;
}
