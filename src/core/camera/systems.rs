use crate::core::camera::components::MainCamera;
use bevy::log::info;
use bevy::math::{EulerRot, Quat, Vec3};
use bevy::prelude::{Camera3d, Commands, DirectionalLight, Transform};
use std::f32::consts::PI;

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.0, 70.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));

    commands.spawn((
        Transform::from_rotation(Quat::from_euler(EulerRot::ZYX, 0.0, 1.0, -PI / 4.)),
        DirectionalLight::default(),
    ));

    info!("Camera spawned");
}
