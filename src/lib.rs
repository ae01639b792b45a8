pub mod boundary;
pub mod collision;
pub mod components;
pub mod config;
pub mod driver;
pub mod error;
pub mod integrator;
pub mod plugin;
pub mod recorder;
pub mod scenario;
pub mod state;

pub use boundary::{reflect, resolve_boundaries, BoundaryReport, Reflection};
pub use collision::{
    classify, pairs, resolve_collisions, resolve_pair, CollisionReport, CollisionStrategy, Contact,
};
pub use config::{BodyConfig, Overrides, RunConfig, ScenarioConfig, WorldConfig};
pub use driver::{FrameReport, RunSummary, StepDriver};
pub use error::ConfigurationError;
pub use integrator::integrate;
pub use plugin::{BallboxPlugin, TrajectoryOutput};
pub use recorder::{NullRecorder, Recorder, Trajectory};
pub use scenario::ScenarioGenerator;
pub use state::{Body, Boundary, SimulationState};
