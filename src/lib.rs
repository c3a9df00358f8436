pub mod math;
pub mod body;
pub mod collision;
pub mod state;
pub mod world;
pub mod population;
pub mod config;

pub use body::Body;
pub use collision::{circles_overlap, resolve, Contact};
pub use state::{Interaction, Trigger};
pub use world::{Bounds, World};
pub use population::SpawnRequest;

pub use config::{ConfigError, Settings, WorldConfig, PopulationConfig, InteractionConfig, DisplayConfig};
