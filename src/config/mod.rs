pub mod traits;
pub mod evolution;
pub mod fitness;
pub mod map;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{EvolutionConfig, SelectionMethod};
pub use fitness::FitnessConfig;
pub use map::{MapConfig, SpawnRoom, Corner};
pub use traits::ConfigSection;
