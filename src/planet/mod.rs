pub mod components;
pub mod events;
pub mod logic;
pub mod resources;
pub mod systems;
pub mod upload;

use crate::planet::events::*;
use crate::planet::resources::*;
use crate::planet::systems::*;
use bevy::prelude::*;

pub struct PlanetPlugin;

impl Plugin for PlanetPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<GeneratePlanetEvent>()
            .add_message::<GenerateNewSeedEvent>()
            .add_message::<CycleViewModeEvent>()
            .init_resource::<PlanetGenerationSettings>()
            .init_resource::<CurrentPlanet>()
            .add_systems(Startup, request_initial_planet)
            .add_systems(
                Update,
                (
                    planet_controls,
                    handle_generate_new_seed,
                    spawn_planet_on_event,
                    apply_view_mode,
                    update_plates,
                )
                    .chain(),
            );
    }
}
