pub mod traits;
pub mod evolution;
pub mod data;
pub mod search;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{EvolutionConfig, CrossoverMethod};
pub use data::DataConfig;
pub use search::SearchConfig;
pub use traits::ConfigSection;
