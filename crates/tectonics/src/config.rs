use crate::error::{PlanetError, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

pub const CONFIG_FILE: &str = "tectonics_config.toml";

static CONFIG: OnceLock<Mutex<TectonicsConfig>> = OnceLock::new();

/// Get a copy of the current configuration, loading from file if not already loaded.
///
/// A missing or malformed file is not fatal: defaults are used and a warning is logged.
pub fn get_config() -> TectonicsConfig {
    let config_mutex = CONFIG.get_or_init(|| Mutex::new(load_or_default(CONFIG_FILE)));
    match config_mutex.lock() {
        Ok(config) => config.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

pub fn reload_config() {
    let new_config = load_or_default(CONFIG_FILE);
    let config_mutex = CONFIG.get_or_init(|| Mutex::new(new_config.clone()));
    match config_mutex.lock() {
        Ok(mut config) => *config = new_config,
        Err(poisoned) => *poisoned.into_inner() = new_config,
    }
}

fn load_or_default(path: &str) -> TectonicsConfig {
    match TectonicsConfig::load_from_file(path) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("using default tectonics config, {path} not loaded: {err}");
            TectonicsConfig::default()
        }
    }
}

/// Sign used when folding the degree and adjacency matrices together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaplacianSign {
    /// `degree + adjacency`, the signless Laplacian.
    #[default]
    Plus,
    /// `degree - adjacency`, the combinatorial Laplacian.
    Minus,
}

impl LaplacianSign {
    pub fn factor(self) -> i32 {
        match self {
            LaplacianSign::Plus => 1,
            LaplacianSign::Minus => -1,
        }
    }
}

/// Which mixed triangles register plate adjacency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjacencyRule {
    /// Only triangles whose corners lie on three different plates.
    #[default]
    TripleJunction,
    /// Any triangle whose corners are not all on one plate.
    AnyStraddle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TectonicsConfig {
    pub generation: GenerationConfig,
    pub plates: PlateConfig,
    pub graph: GraphConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub default_num_plates: usize,
    pub default_radius: f32,
    pub default_subdivision_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateConfig {
    /// Seed displacement off the sphere, as a fraction of the radius.
    pub seed_jitter: f32,
    /// Angular velocities are drawn from `-max..=max`, radians per time unit.
    pub max_angular_velocity: f32,
    pub color_jitter: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    pub laplacian_sign: LaplacianSign,
    #[serde(default)]
    pub adjacency_rule: AdjacencyRule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Multiplier applied to the frame delta before it reaches the kinematics.
    pub time_scale: f32,
}

impl Default for TectonicsConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig {
                default_num_plates: 12,
                default_radius: 20.0,
                default_subdivision_level: 5,
            },
            plates: PlateConfig {
                seed_jitter: 0.15,
                max_angular_velocity: 0.05,
                color_jitter: 0.1,
            },
            graph: GraphConfig {
                laplacian_sign: LaplacianSign::Plus,
                adjacency_rule: AdjacencyRule::TripleJunction,
            },
            simulation: SimulationConfig { time_scale: 1.0 },
        }
    }
}

impl TectonicsConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML accepts `inf` and `nan`; the values below feed sampling ranges and
    /// the frame delta, so they must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("plates.seed_jitter", self.plates.seed_jitter),
            ("plates.max_angular_velocity", self.plates.max_angular_velocity),
            ("plates.color_jitter", self.plates.color_jitter),
            ("simulation.time_scale", self.simulation.time_scale),
        ];
        match fields.into_iter().find(|(_, value)| !value.is_finite() || *value < 0.0) {
            Some((field, value)) => Err(PlanetError::InvalidConfig { field, value }),
            None => Ok(()),
        }
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn angular_velocity_range(&self) -> RangeInclusive<f32> {
        let max = self.plates.max_angular_velocity.abs();
        -max..=max
    }
}
