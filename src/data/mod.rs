pub mod connectors;
pub mod dataset;
pub mod enrich;
pub mod fields;
pub mod table;

pub use connectors::{CsvConnector, DatasetMetadata, PriceColumn, ValueRange};
pub use dataset::Dataset;
pub use enrich::{add_all_indicators, list_indicators_and_candle_values};
pub use fields::{FieldId, LegalFields};
pub use table::{PriceTable, Row};
