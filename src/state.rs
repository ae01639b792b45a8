//! Owned simulation state: the bodies plus the scalars every phase shares.

use bevy::prelude::*;

use crate::config::WorldConfig;
use crate::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub mass: f32,
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Body {
    pub fn new(mass: f32, position: Vec2, velocity: Vec2) -> Self {
        Self { mass, position, velocity }
    }

    pub fn momentum(&self) -> Vec2 {
        self.velocity * self.mass
    }

    fn is_finite(&self) -> bool {
        self.mass.is_finite() && self.position.is_finite() && self.velocity.is_finite()
    }
}

/// Axis aligned box centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    half_extents: Vec2,
}

impl Boundary {
    pub fn new(half_width: f32, half_height: f32) -> Self {
        Self { half_extents: Vec2::new(half_width, half_height) }
    }

    pub fn half_extents(&self) -> Vec2 {
        self.half_extents
    }

    /// Largest |x| and |y| a centre may reach before the ball touches a wall.
    pub fn contact_limits(&self, radius: f32) -> Vec2 {
        self.half_extents - Vec2::splat(radius)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let not_contains = p.x.abs() > self.half_extents.x || p.y.abs() > self.half_extents.y;
        !not_contains
    }
}

/// The single mutable resource of a step. Built once from validated initial
/// conditions, then updated in place by each phase.
#[derive(Resource, Debug, Clone)]
pub struct SimulationState {
    bodies: Vec<Body>,
    radius: f32,
    boundary: Boundary,
    dt: f32,
}

impl SimulationState {
    /// Build from parallel mass / position / velocity arrays.
    pub fn new(
        masses: &[f32],
        positions: &[Vec2],
        velocities: &[Vec2],
        world: &WorldConfig,
    ) -> Result<Self, ConfigurationError> {
        if masses.len() != positions.len() || masses.len() != velocities.len() {
            return Err(ConfigurationError::MismatchedLengths {
                masses: masses.len(),
                positions: positions.len(),
                velocities: velocities.len(),
            });
        }

        let bodies = masses
            .iter()
            .zip(positions)
            .zip(velocities)
            .map(|((&m, &p), &v)| Body::new(m, p, v))
            .collect();

        Self::from_bodies(bodies, world)
    }

    pub fn from_bodies(bodies: Vec<Body>, world: &WorldConfig) -> Result<Self, ConfigurationError> {
        validate_world(world)?;

        if bodies.is_empty() {
            return Err(ConfigurationError::NoBodies);
        }

        for (index, body) in bodies.iter().enumerate() {
            if !body.is_finite() {
                return Err(ConfigurationError::NonFiniteBody { index });
            }
            if body.mass <= 0.0 {
                return Err(ConfigurationError::NonPositiveMass { index, mass: body.mass });
            }
        }

        Ok(Self {
            bodies,
            radius: world.radius,
            boundary: Boundary::new(world.half_width, world.half_height),
            dt: world.dt,
        })
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Mutable view of the bodies. A slice, so the body count stays fixed.
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.bodies.iter().map(|b| b.position).collect()
    }

    pub fn total_momentum(&self) -> Vec2 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.bodies
            .iter()
            .map(|b| 0.5 * b.mass * b.velocity.length_squared())
            .sum()
    }
}

fn validate_world(world: &WorldConfig) -> Result<(), ConfigurationError> {
    let WorldConfig { half_width, half_height, radius, dt } = *world;

    if !(half_width > 0.0 && half_height > 0.0) {
        return Err(ConfigurationError::NonPositiveBoundary { half_width, half_height });
    }
    if !(radius > 0.0) {
        return Err(ConfigurationError::NonPositiveRadius(radius));
    }
    if radius > half_width.min(half_height) {
        return Err(ConfigurationError::RadiusExceedsBoundary { radius, half_width, half_height });
    }
    if !(dt > 0.0) {
        return Err(ConfigurationError::NonPositiveTimeStep(dt));
    }
    Ok(())
}
