//! Configuration types for loading a ballbox run from YAML.
//!
//! A scenario file has three parts:
//!
//! - [`WorldConfig`]      – box half extents, ball radius and time step
//! - [`RunConfig`]        – frame count, collision strategy and recording stride
//! - bodies / generator   – either an explicit body list or a seeded generator
//!
//! ```yaml
//! world:
//!   half_width: 5.0
//!   half_height: 3.0
//!   radius: 0.154
//!   dt: 0.0001
//! run:
//!   frames: 2000
//!   strategy: deferred
//!   record_every: 10
//! bodies:
//!   - { mass: 1.0, position: [-1.0, 0.0], velocity: [ 5.0, 0.0] }
//!   - { mass: 2.0, position: [ 1.0, 0.0], velocity: [-5.0, 0.0] }
//! ```
//!
//! Missing sections fall back to their defaults. When `bodies` is absent the
//! `generator` section (or its default) builds the initial condition.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use bevy::prelude::Vec2;
use serde::Deserialize;

use crate::collision::CollisionStrategy;
use crate::scenario::ScenarioGenerator;
use crate::state::Body;

/// Geometry and time step shared by every body.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub half_width: f32,
    pub half_height: f32,
    pub radius: f32,
    pub dt: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            half_width: 5.0,
            half_height: 3.0,
            radius: 0.154,
            dt: 0.0001,
        }
    }
}

/// How long to run and how to resolve collisions.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct RunConfig {
    pub frames: usize,
    pub strategy: CollisionStrategy,
    /// Keep one recorded frame out of every `record_every`.
    pub record_every: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 50_000,
            strategy: CollisionStrategy::Sequential,
            record_every: 1,
        }
    }
}

/// Initial state of a single body.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BodyConfig {
    pub mass: f32,
    pub position: [f32; 2],
    pub velocity: [f32; 2],
}

impl From<&BodyConfig> for Body {
    fn from(cfg: &BodyConfig) -> Self {
        Body::new(cfg.mass, Vec2::from(cfg.position), Vec2::from(cfg.velocity))
    }
}

/// Command line values that replace what the scenario file says.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Generate this many bodies, discarding any listed in the file.
    pub bodies: Option<usize>,
    pub seed: Option<u64>,
    pub frames: Option<usize>,
    pub strategy: Option<CollisionStrategy>,
    pub record_every: Option<usize>,
}

/// Top-level scenario file.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub world: WorldConfig,
    pub run: RunConfig,
    pub bodies: Option<Vec<BodyConfig>>,
    pub generator: Option<ScenarioGenerator>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("malformed scenario yaml")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open scenario {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader)
            .with_context(|| format!("failed to parse scenario {}", path.display()))
    }

    /// Apply command line values on top of the file. A seed alone cannot
    /// replace an explicit body list, so that combination is rejected.
    pub fn apply(&mut self, overrides: &Overrides) -> Result<()> {
        if overrides.seed.is_some() && overrides.bodies.is_none() && self.bodies.is_some() {
            bail!("--seed needs --bodies when the scenario lists its bodies");
        }

        if overrides.bodies.is_some() || overrides.seed.is_some() {
            let mut generator = self.generator.take().unwrap_or_default();
            if let Some(count) = overrides.bodies {
                generator.count = count;
                self.bodies = None;
            }
            if let Some(seed) = overrides.seed {
                generator.seed = seed;
            }
            self.generator = Some(generator);
        }
        if let Some(frames) = overrides.frames {
            self.run.frames = frames;
        }
        if let Some(strategy) = overrides.strategy {
            self.run.strategy = strategy;
        }
        if let Some(record_every) = overrides.record_every {
            self.run.record_every = record_every;
        }
        Ok(())
    }

    /// The initial bodies: the explicit list if given, otherwise generated.
    pub fn initial_bodies(&self) -> Vec<Body> {
        match &self.bodies {
            Some(bodies) => bodies.iter().map(Body::from).collect(),
            None => self
                .generator
                .clone()
                .unwrap_or_default()
                .generate(&self.world),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = ScenarioConfig::from_yaml_str("{}").unwrap();
        assert_eq!(cfg.world, WorldConfig::default());
        assert_eq!(cfg.run, RunConfig::default());
        assert!(cfg.bodies.is_none());
    }

    #[test]
    fn explicit_bodies_win_over_generator() {
        let cfg = ScenarioConfig::from_yaml_str(LISTED).unwrap();
        let bodies = cfg.initial_bodies();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].position, Vec2::new(0.5, -0.5));
    }

    const LISTED: &str = "bodies:\n  \
        - { mass: 2.0, position: [0.5, -0.5], velocity: [1.0, 0.0] }\n\
        generator:\n  count: 40\n";

    #[test]
    fn seed_alone_cannot_replace_listed_bodies() {
        let mut cfg = ScenarioConfig::from_yaml_str(LISTED).unwrap();
        let overrides = Overrides { seed: Some(5), ..Default::default() };

        assert!(cfg.apply(&overrides).is_err());
        assert_eq!(cfg.initial_bodies().len(), 1);
    }

    #[test]
    fn body_count_replaces_listed_bodies() {
        let mut cfg = ScenarioConfig::from_yaml_str(LISTED).unwrap();
        let overrides = Overrides { bodies: Some(6), seed: Some(5), ..Default::default() };

        cfg.apply(&overrides).unwrap();

        assert!(cfg.bodies.is_none());
        let generator = cfg.generator.clone().unwrap();
        assert_eq!((generator.count, generator.seed), (6, 5));
        assert_eq!(cfg.initial_bodies(), ScenarioGenerator::new(6, 5).generate(&cfg.world));
    }

    #[test]
    fn seed_reseeds_the_generator() {
        let mut cfg = ScenarioConfig::from_yaml_str("generator: { count: 12, seed: 1 }").unwrap();
        let overrides = Overrides { seed: Some(9), ..Default::default() };

        cfg.apply(&overrides).unwrap();

        assert_eq!(cfg.initial_bodies(), ScenarioGenerator::new(12, 9).generate(&cfg.world));
    }

    #[test]
    fn run_values_override_the_file() {
        let mut cfg =
            ScenarioConfig::from_yaml_str("run: { frames: 10, strategy: sequential }").unwrap();
        let overrides = Overrides {
            frames: Some(99),
            strategy: Some(CollisionStrategy::Deferred),
            record_every: Some(4),
            ..Default::default()
        };

        cfg.apply(&overrides).unwrap();

        assert_eq!(
            cfg.run,
            RunConfig { frames: 99, strategy: CollisionStrategy::Deferred, record_every: 4 }
        );
    }
}
