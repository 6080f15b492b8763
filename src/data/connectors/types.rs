use serde::{Deserialize, Serialize};

/// The five price columns every dataset must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceColumn {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl PriceColumn {
    pub const ALL: [PriceColumn; 5] = [
        PriceColumn::Open,
        PriceColumn::High,
        PriceColumn::Low,
        PriceColumn::Close,
        PriceColumn::Volume,
    ];

    /// Name after normalisation
    pub fn name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
        }
    }

    fn abbreviations(self) -> &'static [&'static str] {
        match self {
            Self::Open => &["o"],
            Self::High => &["h"],
            Self::Low => &["l"],
            Self::Close => &["c"],
            Self::Volume => &["vol", "v"],
        }
    }

    /// Whether a CSV header names this column, ignoring case
    pub fn matches(self, header: &str) -> bool {
        let header = header.trim();
        header.eq_ignore_ascii_case(self.name())
            || self
                .abbreviations()
                .iter()
                .any(|short| header.eq_ignore_ascii_case(short))
    }
}

/// Headers recognised as timestamps; never used as trigger fields
pub fn is_timestamp_column(header: &str) -> bool {
    ["date", "datetime", "time", "timestamp"]
        .iter()
        .any(|name| header.trim().eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// Summary of a loaded dataset, logged before a run starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub source: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub timestamp_column: Option<String>,
    pub close: Option<ValueRange>,
    pub volume: Option<ValueRange>,
}
