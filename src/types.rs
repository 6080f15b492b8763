use serde::{Deserialize, Serialize};

/// Closed trade record produced when replaying a single gene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_bar: usize,
    pub exit_bar: usize,
    pub entry_price: f64,
    pub exit_price: f64,
    pub profit: f64,
    pub exit_reason: ExitReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    Signal,
    EndOfData,
}

/// What happens to a position that is still open when the rows run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndOfDataPolicy {
    /// Unrealized profit is ignored; the position is dropped.
    #[default]
    Discard,
    /// The position is closed at the last row's reference price.
    CloseAtLast,
}
