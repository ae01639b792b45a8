//! Explicit Euler position update.

use rayon::prelude::*;

use crate::state::Body;

/// `position += velocity * dt` for every body. Bodies are independent, so the
/// slice is split across the rayon pool.
pub fn integrate(bodies: &mut [Body], dt: f32) {
    bodies.par_iter_mut().for_each(|body| {
        body.position += body.velocity * dt;
    });
}
