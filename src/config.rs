// Every key is optional, see ballpit.toml for the defaults

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    pub air_density: f32,
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            width: 1200.0,
            height: 600.0,
            gravity: 0.2,
            air_density: 0.001,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub initial: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub friction: f32,
    pub max_spawn_speed: f32,
    pub spawn_cooldown: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        PopulationConfig {
            initial: 100,
            min_radius: 5.0,
            max_radius: 30.0,
            friction: 0.9,
            max_spawn_speed: 10.0,
            spawn_cooldown: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub impulse: f32, // Per-axis bound of the random kick
    pub nudge: f32, // Velocity added per frame by the arrow keys
    pub spawn_size: f32,
    pub spawn_size_step: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        InteractionConfig {
            impulse: 20.0,
            nudge: 1.0,
            spawn_size: 10.0,
            spawn_size_step: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub trails: bool,
    pub fps: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig { trails: true, fps: 60 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub world: WorldConfig,
    pub population: PopulationConfig,
    pub interaction: InteractionConfig,
    pub display: DisplayConfig,
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
        let content = fs::read_to_string(path)?;
        Settings::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Settings, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        let p = &self.population;
        let i = &self.interaction;

        check(w.width > 0.0 && w.height > 0.0, "world size must be positive")?;
        check(w.gravity.is_finite(), "gravity must be finite")?;
        check(w.air_density.is_finite() && w.air_density >= 0.0,
              "air_density must be finite and non-negative")?;
        check(p.min_radius > 0.0, "min_radius must be positive")?;
        check(p.min_radius <= p.max_radius, "min_radius must not exceed max_radius")?;
        check(p.friction > 0.0 && p.friction <= 1.0, "friction must be in (0, 1]")?;
        check(p.max_spawn_speed >= 0.0, "max_spawn_speed must be non-negative")?;
        check(i.spawn_size > 0.0, "spawn_size must be positive")?;
        check(i.spawn_size_step > 0.0, "spawn_size_step must be positive")?;
        check(self.display.fps > 0, "fps must be positive")?;
        Ok(())
    }
}

fn check(ok: bool, message: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid(message.to_string()))
    }
}
