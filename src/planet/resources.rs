use bevy::prelude::{Handle, Mesh, Resource};
use tectonics::mesh_data::ViewMode;
use tectonics::planet::Planet;

#[derive(Resource, Clone)]
pub struct PlanetGenerationSettings {
    pub radius: f32,
    pub num_plates: usize,
    pub subdivision_level: u32,
    pub user_seed: u32,
    pub seed: u64,
    pub time_scale: f32,
    pub paused: bool,
    pub view_mode: ViewMode,
}

impl Default for PlanetGenerationSettings {
    fn default() -> Self {
        let config = tectonics::get_config();
        let seed_8 = tectonics::tools::generate_seed8();
        Self {
            radius: config.generation.default_radius,
            num_plates: config.generation.default_num_plates,
            subdivision_level: config.generation.default_subdivision_level,
            user_seed: seed_8,
            seed: tectonics::tools::expand_seed64(seed_8),
            time_scale: config.simulation.time_scale,
            paused: false,
            view_mode: ViewMode::default(),
        }
    }
}

/// The live planet and the mesh asset it uploads into.
#[derive(Resource, Default)]
pub struct CurrentPlanet {
    pub planet: Option<Planet>,
    pub mesh: Option<Handle<Mesh>>,
}
