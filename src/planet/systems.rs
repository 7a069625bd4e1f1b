use crate::core::camera::components::MainCamera;
use crate::planet::components::PlanetEntity;
use crate::planet::events::*;
use crate::planet::logic::{adjust_plate_count, camera_distance, planet_settings};
use crate::planet::resources::*;
use crate::planet::upload::{BevyFrameTimer, BevyMeshUpload};
use bevy::asset::Assets;
use bevy::color::Color;
use bevy::input::ButtonInput;
use bevy::math::Vec3;
use bevy::pbr::{MeshMaterial3d, StandardMaterial};
use bevy::prelude::*;
use tectonics::mesh_data::vertex_colors;
use tectonics::planet::Planet;
use tectonics::tools::{expand_seed64, generate_seed8};

pub fn request_initial_planet(mut events: MessageWriter<GeneratePlanetEvent>) {
    events.write(GeneratePlanetEvent);
}

pub fn planet_controls(
    keys: Res<ButtonInput<KeyCode>>,
    mut settings: ResMut<PlanetGenerationSettings>,
    mut generate: MessageWriter<GeneratePlanetEvent>,
    mut new_seed: MessageWriter<GenerateNewSeedEvent>,
    mut view_mode: MessageWriter<CycleViewModeEvent>,
) {
    if keys.just_pressed(KeyCode::Space) {
        settings.paused = !settings.paused;
        info!("simulation {}", if settings.paused { "paused" } else { "resumed" });
    }
    if keys.just_pressed(KeyCode::KeyN) {
        new_seed.write(GenerateNewSeedEvent);
    }
    if keys.just_pressed(KeyCode::KeyV) {
        view_mode.write(CycleViewModeEvent);
    }

    let delta = if keys.any_just_pressed([KeyCode::Equal, KeyCode::NumpadAdd]) {
        1
    } else if keys.any_just_pressed([KeyCode::Minus, KeyCode::NumpadSubtract]) {
        -1
    } else {
        0
    };
    if delta != 0 {
        let plates = adjust_plate_count(settings.num_plates, delta);
        if plates != settings.num_plates {
            settings.num_plates = plates;
            generate.write(GeneratePlanetEvent);
        }
    }
}

pub fn handle_generate_new_seed(
    mut events: MessageReader<GenerateNewSeedEvent>,
    mut settings: ResMut<PlanetGenerationSettings>,
    mut generate: MessageWriter<GeneratePlanetEvent>,
) {
    for _ in events.read() {
        let seed_8 = generate_seed8();
        settings.user_seed = seed_8;
        settings.seed = expand_seed64(seed_8);
        info!("new seed {seed_8}");
        generate.write(GeneratePlanetEvent);
    }
}

pub fn spawn_planet_on_event(
    mut commands: Commands,
    mut events: MessageReader<GeneratePlanetEvent>,
    mut current: ResMut<CurrentPlanet>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<PlanetGenerationSettings>,
    planet_entities: Query<Entity, With<PlanetEntity>>,
    mut camera: Query<&mut Transform, With<MainCamera>>,
) {
    // Several requests in one frame collapse into a single rebuild.
    if events.read().count() == 0 {
        return;
    }

    tectonics::reload_config();
    let config = tectonics::get_config();

    let mut upload = BevyMeshUpload::new(&mut *meshes);
    let planet = match Planet::new(planet_settings(&settings), &config, &mut upload) {
        Ok(planet) => planet,
        Err(err) => {
            error!("planet generation failed: {err}");
            return;
        }
    };
    let Some(handle) = upload.into_handle() else {
        return;
    };

    for entity in planet_entities.iter() {
        commands.entity(entity).despawn();
    }
    if let Some(old) = current.mesh.take() {
        meshes.remove(&old);
    }

    if let Some(mesh) = meshes.get_mut(&handle) {
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, vertex_colors(&planet, settings.view_mode));
    }

    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        perceptual_roughness: 0.8,
        ..default()
    });

    commands.spawn((
        Mesh3d(handle.clone()),
        MeshMaterial3d(material),
        Transform::default(),
        PlanetEntity,
    ));

    if let Ok(mut transform) = camera.single_mut() {
        *transform = Transform::from_xyz(0.0, 0.0, camera_distance(planet.radius()))
            .looking_at(Vec3::ZERO, Vec3::Y);
    }

    current.planet = Some(planet);
    current.mesh = Some(handle);
}

pub fn apply_view_mode(
    mut events: MessageReader<CycleViewModeEvent>,
    mut settings: ResMut<PlanetGenerationSettings>,
    current: Res<CurrentPlanet>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let presses = events.read().count();
    if presses == 0 {
        return;
    }
    for _ in 0..presses {
        settings.view_mode = settings.view_mode.next();
    }
    info!("view mode: {:?}", settings.view_mode);

    let (Some(planet), Some(handle)) = (&current.planet, &current.mesh) else {
        return;
    };
    if let Some(mesh) = meshes.get_mut(handle) {
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, vertex_colors(planet, settings.view_mode));
    }
}

pub fn update_plates(
    time: Res<Time>,
    settings: Res<PlanetGenerationSettings>,
    mut current: ResMut<CurrentPlanet>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let CurrentPlanet { planet, mesh } = &mut *current;
    let (Some(planet), Some(handle)) = (planet.as_mut(), mesh.clone()) else {
        return;
    };
    if settings.paused {
        return;
    }

    let timer = BevyFrameTimer::new(&time, settings.time_scale);
    let mut upload = BevyMeshUpload::with_handle(&mut *meshes, handle);
    planet.update_plates(&timer, &mut upload);
}
