//! Frame loop: integrate, reflect, collide, publish.
//!
//! Each phase finishes for every body (or pair) before the next begins. A run
//! can only be stopped between frames.

use std::fmt;

use bevy::prelude::*;

use crate::boundary::resolve_boundaries;
use crate::collision::{resolve_collisions, CollisionStrategy};
use crate::integrator::integrate;
use crate::recorder::Recorder;
use crate::state::SimulationState;

/// What happened during one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: usize,
    pub reflections: usize,
    pub collisions: usize,
    pub degenerate: Vec<(usize, usize)>,
    pub escaped: Vec<usize>,
}

/// Totals over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: usize,
    pub reflections: usize,
    pub collisions: usize,
    pub degenerate: usize,
    pub escapes: usize,
    pub stopped_early: bool,
}

impl RunSummary {
    pub fn absorb(&mut self, report: &FrameReport) {
        self.frames += 1;
        self.reflections += report.reflections;
        self.collisions += report.collisions;
        self.degenerate += report.degenerate.len();
        self.escapes += report.escaped.len();
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames: {} collisions, {} reflections, {} degenerate, {} escapes",
            self.frames, self.collisions, self.reflections, self.degenerate, self.escapes
        )?;
        if self.stopped_early {
            write!(f, " (stopped early)")?;
        }
        Ok(())
    }
}

#[derive(Resource, Debug, Clone)]
pub struct StepDriver {
    frame: usize,
    frames: usize,
    strategy: CollisionStrategy,
    summary: RunSummary,
}

impl StepDriver {
    pub fn new(frames: usize, strategy: CollisionStrategy) -> Self {
        Self {
            frame: 0,
            frames,
            strategy,
            summary: RunSummary::default(),
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.frames
    }

    /// Advance one frame regardless of the configured frame count.
    pub fn step(&mut self, state: &mut SimulationState) -> FrameReport {
        let radius = state.radius();
        let boundary = state.boundary();
        let dt = state.dt();
        let bodies = state.bodies_mut();

        integrate(bodies, dt);
        let walls = resolve_boundaries(bodies, boundary, radius);
        let contacts = resolve_collisions(bodies, radius, dt, self.strategy);

        let report = FrameReport {
            frame: self.frame,
            reflections: walls.reflections,
            collisions: contacts.collisions,
            degenerate: contacts.degenerate,
            escaped: walls.escaped,
        };

        if !report.escaped.is_empty() {
            warn!(
                "frame {}: {} bodies outside the boundary",
                report.frame,
                report.escaped.len()
            );
        }
        debug!(
            "frame {}: {} reflections, {} collisions",
            report.frame, report.reflections, report.collisions
        );

        self.summary.absorb(&report);
        self.frame += 1;
        report
    }

    /// Run to the configured frame count.
    pub fn run<R: Recorder>(
        &mut self,
        state: &mut SimulationState,
        recorder: &mut R,
    ) -> RunSummary {
        self.run_while(state, recorder, |_| true)
    }

    /// Run until the frame count is reached or `keep_going` returns false for
    /// a frame's report. The recorder always sees the frame that stopped it.
    pub fn run_while<R, F>(
        &mut self,
        state: &mut SimulationState,
        recorder: &mut R,
        mut keep_going: F,
    ) -> RunSummary
    where
        R: Recorder,
        F: FnMut(&FrameReport) -> bool,
    {
        info!(
            "running {} bodies for {} frames ({:?} collisions)",
            state.len(),
            self.frames.saturating_sub(self.frame),
            self.strategy
        );

        while !self.is_finished() {
            let report = self.step(state);
            recorder.record(report.frame, &state.positions());
            if !keep_going(&report) {
                self.summary.stopped_early = !self.is_finished();
                break;
            }
        }

        info!("finished after {}", self.summary);
        self.summary
    }
}
