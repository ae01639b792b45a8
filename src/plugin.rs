//! Headless Bevy wiring for the step driver.
//!
//! One frame of the simulation runs per app update. After each frame the
//! positions are recorded and mirrored onto one entity per body, so a viewer
//! can query `Position` components without touching the state directly.

use std::path::PathBuf;

use bevy::app::AppExit;
use bevy::prelude::*;

use crate::components::{BodyIndex, Position};
use crate::config::RunConfig;
use crate::driver::{FrameReport, StepDriver};
use crate::recorder::{Recorder, Trajectory};
use crate::state::SimulationState;

/// Where the finished trajectory is written, if anywhere.
#[derive(Resource, Debug, Clone, Default)]
pub struct TrajectoryOutput(pub Option<PathBuf>);

pub struct BallboxPlugin {
    state: SimulationState,
    run: RunConfig,
    output: Option<PathBuf>,
}

impl BallboxPlugin {
    pub fn new(state: SimulationState, run: RunConfig) -> Self {
        Self { state, run, output: None }
    }

    pub fn with_output(mut self, path: PathBuf) -> Self {
        self.output = Some(path);
        self
    }
}

impl Plugin for BallboxPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.state.clone())
            .insert_resource(StepDriver::new(self.run.frames, self.run.strategy))
            .insert_resource(Trajectory::new(self.run.record_every))
            .insert_resource(TrajectoryOutput(self.output.clone()))
            .add_event::<FrameReport>()
            .add_event::<AppExit>()
            .add_startup_system(spawn_bodies_system)
            .add_system(step_system)
            .add_system(record_system.after(step_system))
            .add_system(sync_positions_system.after(step_system))
            .add_system(finish_system.after(record_system));
    }
}

fn spawn_bodies_system(mut commands: Commands, state: Res<SimulationState>) {
    for (i, body) in state.bodies().iter().enumerate() {
        commands.spawn((BodyIndex(i), Position(body.position)));
    }
    info!("spawned {} bodies", state.len());
}

fn step_system(
    mut state: ResMut<SimulationState>,
    mut driver: ResMut<StepDriver>,
    mut reports: EventWriter<FrameReport>,
) {
    if driver.is_finished() {
        return;
    }
    let report = driver.step(&mut state);
    reports.send(report);
}

fn record_system(
    state: Res<SimulationState>,
    mut trajectory: ResMut<Trajectory>,
    mut reports: EventReader<FrameReport>,
) {
    for report in reports.iter() {
        trajectory.record(report.frame, &state.positions());
    }
}

fn sync_positions_system(
    state: Res<SimulationState>,
    mut q: Query<(&BodyIndex, &mut Position)>,
) {
    if !state.is_changed() {
        return;
    }
    for (index, mut position) in q.iter_mut() {
        if let Some(body) = state.bodies().get(index.0) {
            position.0 = body.position;
        }
    }
}

fn finish_system(
    driver: Res<StepDriver>,
    trajectory: Res<Trajectory>,
    output: Res<TrajectoryOutput>,
    mut exit: EventWriter<AppExit>,
    mut done: Local<bool>,
) {
    if *done || !driver.is_finished() {
        return;
    }
    *done = true;

    info!("finished after {}", driver.summary());

    if let Some(path) = &output.0 {
        if let Err(err) = trajectory.save(path) {
            error!("{:#}", err);
        }
    }

    exit.send(AppExit);
}
