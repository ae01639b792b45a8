//! Reproducible random initial conditions.
//!
//! The generator is seeded explicitly so the same seed always yields the same
//! bodies. The simulation core never calls it; it only consumes the result.

use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::Deserialize;

use crate::config::WorldConfig;
use crate::state::Body;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ScenarioGenerator {
    pub count: usize,
    pub seed: u64,
    /// Bodies are placed at least this far inside each wall.
    pub margin: f32,
    /// Mass is `10^(u * mass_decades + mass_offset)`.
    pub mass_decades: f32,
    pub mass_offset: f32,
    /// Peak speed along each axis.
    pub max_speed: [f32; 2],
    /// Speeds are `max_speed * u^speed_exponent`, so most bodies move fast.
    pub speed_exponent: f32,
}

impl Default for ScenarioGenerator {
    fn default() -> Self {
        Self {
            count: 10,
            seed: 0,
            margin: 0.2,
            mass_decades: 3.0,
            mass_offset: 0.1,
            max_speed: [200.0, 50.0],
            speed_exponent: 0.1,
        }
    }
}

impl ScenarioGenerator {
    pub fn new(count: usize, seed: u64) -> Self {
        Self { count, seed, ..Default::default() }
    }

    pub fn generate(&self, world: &WorldConfig) -> Vec<Body> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let extent = Vec2::new(
            (world.half_width - self.margin).max(0.0),
            (world.half_height - self.margin).max(0.0),
        );
        let max_speed = Vec2::from(self.max_speed);

        (0..self.count)
            .map(|_| {
                let mass = 10f32.powf(rng.gen::<f32>() * self.mass_decades + self.mass_offset);
                let px = extent.x * rng.gen::<f32>();
                let py = extent.y * rng.gen::<f32>();
                let vx = max_speed.x * rng.gen::<f32>().powf(self.speed_exponent);
                let vy = max_speed.y * rng.gen::<f32>().powf(self.speed_exponent);
                let position = Vec2::new(signed(&mut rng, px), signed(&mut rng, py));
                let velocity = Vec2::new(signed(&mut rng, vx), signed(&mut rng, vy));
                Body::new(mass, position, velocity)
            })
            .collect()
    }
}

fn signed(rng: &mut StdRng, magnitude: f32) -> f32 {
    if rng.gen_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}
