//! Wall reflection.
//!
//! A velocity component is negated whenever the matching coordinate lies past
//! the wall minus the radius. Positions are never pulled back inside, so a
//! fast ball can stay outside the box until a later integration step returns
//! it. Such a ball is reported as escaped rather than corrected.

use bevy::prelude::*;
use rayon::prelude::*;

use crate::state::{Body, Boundary};

/// Which velocity components a single body had flipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reflection {
    pub x: bool,
    pub y: bool,
}

impl Reflection {
    pub fn any(&self) -> bool {
        self.x || self.y
    }

    pub fn count(&self) -> usize {
        usize::from(self.x) + usize::from(self.y)
    }
}

/// Outcome of one boundary phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryReport {
    /// Number of flipped velocity components across all bodies.
    pub reflections: usize,
    /// Bodies whose centre sits outside the box after reflection.
    pub escaped: Vec<usize>,
}

/// Reflect one body against `limits` (the contact limits of the box).
/// Axes are independent; both may flip in the same call.
pub fn reflect(body: &mut Body, limits: Vec2) -> Reflection {
    let mut reflection = Reflection::default();

    if body.position.x.abs() > limits.x {
        body.velocity.x = -body.velocity.x;
        reflection.x = true;
    }
    if body.position.y.abs() > limits.y {
        body.velocity.y = -body.velocity.y;
        reflection.y = true;
    }

    reflection
}

pub fn resolve_boundaries(bodies: &mut [Body], boundary: Boundary, radius: f32) -> BoundaryReport {
    let limits = boundary.contact_limits(radius);

    let outcomes: Vec<(Reflection, bool)> = bodies
        .par_iter_mut()
        .map(|body| {
            let reflection = reflect(body, limits);
            (reflection, !boundary.contains(body.position))
        })
        .collect();

    let mut report = BoundaryReport::default();
    for (index, (reflection, escaped)) in outcomes.into_iter().enumerate() {
        report.reflections += reflection.count();
        if escaped {
            debug!("body {} is outside the boundary after reflection", index);
            report.escaped.push(index);
        }
    }
    report
}
