use thiserror::Error;

#[derive(Error, Debug)]
pub enum TradegeneError {
    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("Field '{field}' is not present in the price table")]
    MissingField { field: String },

    #[error("Indicator error: {0}")]
    IndicatorError(String),

    #[error("Backtest error: {0}")]
    BacktestError(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, TradegeneError>;
