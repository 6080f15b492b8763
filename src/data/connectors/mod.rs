pub(crate) mod csv;
mod types;
pub(crate) mod validator;

pub use csv::CsvConnector;
pub use types::{is_timestamp_column, DatasetMetadata, PriceColumn, ValueRange};
