use thiserror::Error;

/// Rejected initial conditions. Raised once, when a `SimulationState` is
/// built; nothing is clamped into range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("a simulation needs at least one body")]
    NoBodies,

    #[error(
        "mass, position and velocity arrays differ in length \
         ({masses}, {positions}, {velocities})"
    )]
    MismatchedLengths {
        masses: usize,
        positions: usize,
        velocities: usize,
    },

    #[error("body {index} has non-positive mass {mass}")]
    NonPositiveMass { index: usize, mass: f32 },

    #[error("body {index} has a non-finite mass, position or velocity")]
    NonFiniteBody { index: usize },

    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    #[error("boundary half extents must be positive, got {half_width} x {half_height}")]
    NonPositiveBoundary { half_width: f32, half_height: f32 },

    #[error("radius {radius} exceeds the boundary half extents {half_width} x {half_height}")]
    RadiusExceedsBoundary {
        radius: f32,
        half_width: f32,
        half_height: f32,
    },

    #[error("time step must be positive, got {0}")]
    NonPositiveTimeStep(f32),
}
