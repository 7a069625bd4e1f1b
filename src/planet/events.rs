use bevy::prelude::*;

#[derive(Message)]
pub struct GeneratePlanetEvent;

#[derive(Message)]
pub struct GenerateNewSeedEvent;

#[derive(Message)]
pub struct CycleViewModeEvent;
