//! Domain error types.

use crate::domain::indicator::IndicatorError;

/// Top-level error type for stocklens.
#[derive(Debug, thiserror::Error)]
pub enum StocklensError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error("no price data found for {ticker}")]
    DataNotFound { ticker: String },

    #[error("bad price data for {ticker}: {reason}")]
    PriceData { ticker: String, reason: String },

    #[error("chart rendering failed for {ticker}: {reason}")]
    Chart { ticker: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StocklensError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        StocklensError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&StocklensError> for std::process::ExitCode {
    fn from(err: &StocklensError) -> Self {
        let code: u8 = match err {
            StocklensError::Io(_) | StocklensError::Chart { .. } => 1,
            StocklensError::ConfigParse { .. } | StocklensError::ConfigInvalid { .. } => 2,
            StocklensError::Validation { .. } => 3,
            StocklensError::Indicator(_) => 4,
            StocklensError::DataNotFound { .. } | StocklensError::PriceData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
