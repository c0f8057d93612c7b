pub mod traits;
pub mod evolution;
pub mod network;
pub mod data;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{EvolutionConfig, ParentSelection, StopStrategy};
pub use network::NetworkConfig;
pub use data::DataConfig;
pub use traits::{ConfigSection, ConfigManifest, FieldManifest};
