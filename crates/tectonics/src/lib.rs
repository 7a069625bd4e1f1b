pub mod boundary;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod error;
pub mod icosphere;
pub mod kinematics;
pub mod mesh;
pub mod mesh_data;
pub mod planet;
pub mod plate;
pub mod seeder;
pub mod tools;
pub mod upload;

pub use config::{get_config, reload_config};
pub use error::{PlanetError, Result};
pub use planet::{Planet, PlanetSettings};
