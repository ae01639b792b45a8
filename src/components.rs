use bevy::prelude::*;

/// Index of the body this entity mirrors in the `SimulationState`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyIndex(pub usize);

/// Latest position of the mirrored body, refreshed after every frame.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);
