//! Per-frame position sinks.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use bevy::prelude::*;
use serde::Serialize;

/// Receives every body's position, in body-index order, after each frame.
pub trait Recorder {
    fn record(&mut self, frame: usize, positions: &[Vec2]);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecorder;

impl Recorder for NullRecorder {
    fn record(&mut self, _frame: usize, _positions: &[Vec2]) {}
}

/// In-memory trajectory, keeping one frame in every `record_every`.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Trajectory {
    record_every: usize,
    frames: Vec<Vec<Vec2>>,
}

#[derive(Serialize)]
struct TrajectoryFile {
    record_every: usize,
    frames: Vec<Vec<[f32; 2]>>,
}

impl Trajectory {
    pub fn new(record_every: usize) -> Self {
        Self {
            record_every: record_every.max(1),
            frames: Vec::new(),
        }
    }

    pub fn record_every(&self) -> usize {
        self.record_every
    }

    pub fn frames(&self) -> &[Vec<Vec2>] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        let file = TrajectoryFile {
            record_every: self.record_every,
            frames: self
                .frames
                .iter()
                .map(|frame| frame.iter().map(|p| p.to_array()).collect())
                .collect(),
        };
        serde_json::to_writer(writer, &file).context("failed to serialize trajectory")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write_json(&mut writer)?;
        writer.flush()?;
        info!("wrote {} frames to {}", self.frames.len(), path.display());
        Ok(())
    }
}

impl Default for Trajectory {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Recorder for Trajectory {
    fn record(&mut self, frame: usize, positions: &[Vec2]) {
        if frame % self.record_every == 0 {
            self.frames.push(positions.to_vec());
        }
    }
}
