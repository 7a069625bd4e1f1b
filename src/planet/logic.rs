use crate::planet::resources::PlanetGenerationSettings;
use tectonics::planet::PlanetSettings;

pub const MIN_PLATES: usize = 1;
pub const MAX_PLATES: usize = 64;

/// Camera distance that keeps the whole planet in view.
const CAMERA_DISTANCE_FACTOR: f32 = 3.5;

/// Pure business logic: translate UI settings into generator settings
pub fn planet_settings(settings: &PlanetGenerationSettings) -> PlanetSettings {
    PlanetSettings::new(settings.num_plates, settings.radius, settings.subdivision_level)
        .with_seed(settings.seed)
}

pub fn adjust_plate_count(current: usize, delta: isize) -> usize {
    current
        .saturating_add_signed(delta)
        .clamp(MIN_PLATES, MAX_PLATES)
}

/// Elapsed simulation time for one frame.
pub fn scaled_delta(frame_delta: f32, time_scale: f32) -> f32 {
    frame_delta * time_scale
}

pub fn camera_distance(radius: f32) -> f32 {
    radius * CAMERA_DISTANCE_FACTOR
}
