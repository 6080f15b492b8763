pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use trend::{SMA, EMA, MACD, BollingerBands};
pub use momentum::{RSI, Stochastic, WilliamsR, ROC};
pub use volatility::ATR;
pub use volume::{OBV, MFI};
