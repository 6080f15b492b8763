pub mod backtester;
pub mod expression;
pub mod portfolio;

pub use backtester::{Backtest, Backtester, FitnessRecord};
pub use expression::{format_trigger, get_expression};
pub use portfolio::{Portfolio, Position};
