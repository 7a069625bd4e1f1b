use bevy::prelude::*;

#[derive(Component)]
pub struct PlanetEntity;
