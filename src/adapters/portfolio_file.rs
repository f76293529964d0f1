//! JSON portfolio document parsing.
//!
//! Expected shape:
//!
//! ```json
//! {
//!     "portfolio": {
//!         "AAPL": { "buy_date": "2022-08-02", "buy_price": 200, "quantity": 5 }
//!     }
//! }
//! ```
//!
//! Every entry is validated before anything is fetched or loaded; the first
//! violation aborts the whole parse with an error naming the offending field.

use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

use crate::domain::error::StocklensError;
use crate::domain::portfolio::PortfolioEntry;
use crate::domain::validation::{FieldKind, FieldSpec, FieldValue, validate_field};

pub fn parse_portfolio_file(path: &Path) -> Result<Vec<PortfolioEntry>, StocklensError> {
    let content = fs::read_to_string(path)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;
    parse_portfolio_str(&content)
}

pub fn parse_portfolio_str(content: &str) -> Result<Vec<PortfolioEntry>, StocklensError> {
    let doc: Value = serde_json::from_str(content)
        .map_err(|e| StocklensError::validation("portfolio", format!("invalid JSON: {}", e)))?;

    let portfolio = doc
        .get("portfolio")
        .ok_or_else(|| StocklensError::validation("portfolio", "'portfolio' key not found"))?;

    let is_empty = portfolio.is_null()
        || portfolio.as_object().is_some_and(|o| o.is_empty())
        || portfolio.as_array().is_some_and(|a| a.is_empty());
    if is_empty {
        return Err(StocklensError::validation("portfolio", "portfolio is empty"));
    }

    let entries_map = portfolio.as_object().ok_or_else(|| {
        StocklensError::validation("portfolio", "must be a key/value mapping of ticker to details")
    })?;

    let mut entries = Vec::with_capacity(entries_map.len());
    for (ticker, details) in entries_map {
        if ticker.trim().is_empty() {
            return Err(StocklensError::validation("ticker", "must not be empty"));
        }

        let details = details.as_object().ok_or_else(|| {
            StocklensError::validation(
                "portfolio",
                format!("entry for {} must be an object", ticker),
            )
        })?;

        let buy_date_raw = details
            .get("buy_date")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                StocklensError::validation("buy_date", format!("missing or not a string for {}", ticker))
            })?;
        let spec = FieldSpec::required("buy_date", FieldKind::Date);
        let buy_date = match validate_field(&spec, buy_date_raw)? {
            FieldValue::Date(d) => d,
            _ => unreachable!("date spec yields a date"),
        };

        let buy_price = details
            .get("buy_price")
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                StocklensError::validation("buy_price", format!("missing or not a number for {}", ticker))
            })?;
        if buy_price <= 0.0 {
            return Err(StocklensError::validation(
                "buy_price",
                format!("must be positive for {}", ticker),
            ));
        }

        let quantity = details
            .get("quantity")
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                StocklensError::validation(
                    "quantity",
                    format!("missing or not an integer for {}", ticker),
                )
            })?;
        if quantity <= 0 {
            return Err(StocklensError::validation(
                "quantity",
                format!("must be positive for {}", ticker),
            ));
        }

        entries.push(PortfolioEntry {
            ticker: ticker.clone(),
            buy_date,
            buy_price,
            quantity,
        });
    }

    Ok(entries)
}
