//! Brute-force pairwise collision detection and normal-impulse exchange.
//!
//! Every unordered pair `(i, j)` with `i < j` is examined once per frame. A
//! pair is resolved when the centres are within `2 * radius` and a tiny
//! forward projection of the relative motion brings them closer. Only the
//! velocity component along the line of centres changes.
//!
//! Pairs sharing a body would race on that body's velocity if evaluated
//! concurrently without coordination. [`CollisionStrategy`] picks how that is
//! avoided, and the two strategies give different results when a body touches
//! more than one other body in the same frame.

use bevy::prelude::*;
use rayon::prelude::*;
use serde::Deserialize;

use crate::state::Body;

/// Fraction of `dt` used for the approach test. Never applied to state.
pub const NUDGE_FRACTION: f32 = 1.0 / 1000.0;

#[derive(Deserialize, clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CollisionStrategy {
    /// Ascending `(i, j)` on one thread. Later pairs see velocities already
    /// changed by earlier pairs.
    #[default]
    Sequential,
    /// All pairs classified in parallel against the velocities at the start
    /// of the phase, impulses applied afterwards in ascending pair order.
    Deferred,
}

/// Classification of a single pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Further apart than `2 * radius`.
    Apart,
    /// In range but moving apart, or not moving relative to each other.
    Separating,
    /// In range with coincident centres; no normal exists.
    Degenerate,
    /// In range and approaching. Holds the impulse per unit of partner mass.
    Approaching(Vec2),
}

/// Outcome of one pairwise phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub collisions: usize,
    pub degenerate: Vec<(usize, usize)>,
}

/// Every unordered pair of `0..n`, ascending.
pub fn pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}

pub fn classify(a: &Body, b: &Body, radius: f32, dt: f32) -> Contact {
    let diff = a.position - b.position;
    let dist = diff.length();

    if dist > 2.0 * radius {
        return Contact::Apart;
    }
    if dist == 0.0 {
        return Contact::Degenerate;
    }

    let rel_velocity = a.velocity - b.velocity;
    let dist_nudge = (diff + rel_velocity * (dt * NUDGE_FRACTION)).length();
    if dist_nudge >= dist {
        return Contact::Separating;
    }

    let unit = diff / dist;
    let impulse = unit * rel_velocity.dot(unit) / (a.mass + b.mass);
    if !impulse.is_finite() {
        return Contact::Degenerate;
    }
    Contact::Approaching(impulse)
}

fn apply(bodies: &mut [Body], i: usize, j: usize, impulse: Vec2) {
    let (mass_i, mass_j) = (bodies[i].mass, bodies[j].mass);
    bodies[i].velocity -= impulse * mass_j;
    bodies[j].velocity += impulse * mass_i;
}

/// Classify and, if approaching, resolve a single pair in place.
/// `i == j` is never a contact.
pub fn resolve_pair(bodies: &mut [Body], i: usize, j: usize, radius: f32, dt: f32) -> Contact {
    if i == j {
        return Contact::Apart;
    }

    let contact = classify(&bodies[i], &bodies[j], radius, dt);
    if let Contact::Approaching(impulse) = contact {
        apply(bodies, i, j, impulse);
    }
    contact
}

pub fn resolve_collisions(
    bodies: &mut [Body],
    radius: f32,
    dt: f32,
    strategy: CollisionStrategy,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    match strategy {
        CollisionStrategy::Sequential => {
            for (i, j) in pairs(bodies.len()) {
                let contact = resolve_pair(bodies, i, j, radius, dt);
                tally(&mut report, i, j, contact);
            }
        }
        CollisionStrategy::Deferred => {
            let contacts = deferred_contacts(bodies, radius, dt);

            for (i, j, contact) in contacts {
                if let Contact::Approaching(impulse) = contact {
                    apply(bodies, i, j, impulse);
                }
                tally(&mut report, i, j, contact);
            }
        }
    }

    report
}

/// Pairs worth acting on, classified against `snapshot` in parallel and
/// returned in ascending pair order.
fn deferred_contacts(snapshot: &[Body], radius: f32, dt: f32) -> Vec<(usize, usize, Contact)> {
    (0..snapshot.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            (i + 1..snapshot.len()).filter_map(move |j| {
                match classify(&snapshot[i], &snapshot[j], radius, dt) {
                    Contact::Apart | Contact::Separating => None,
                    contact => Some((i, j, contact)),
                }
            })
        })
        .collect()
}

fn tally(report: &mut CollisionReport, i: usize, j: usize, contact: Contact) {
    match contact {
        Contact::Approaching(_) => {
            debug!("collision between bodies {} and {}", i, j);
            report.collisions += 1;
        }
        Contact::Degenerate => {
            warn!("bodies {} and {} share a centre; collision skipped", i, j);
            report.degenerate.push((i, j));
        }
        Contact::Apart | Contact::Separating => (),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_are_unordered_and_ascending() {
        let all: Vec<_> = pairs(4).collect();
        assert_eq!(all, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        assert_eq!(pairs(1).count(), 0);
    }

    #[test]
    fn deferred_keeps_only_actionable_pairs() {
        let bodies = vec![
            // 0 and 1 overlap but move apart
            Body::new(1.0, Vec2::new(-0.1, 0.0), Vec2::new(-1.0, 0.0)),
            Body::new(1.0, Vec2::new(0.1, 0.0), Vec2::new(1.0, 0.0)),
            // 2 and 3 close in
            Body::new(1.0, Vec2::new(2.0, 0.0), Vec2::new(1.0, 0.0)),
            Body::new(1.0, Vec2::new(2.2, 0.0), Vec2::new(-1.0, 0.0)),
            // 4 and 5 coincide
            Body::new(1.0, Vec2::new(-2.0, 1.0), Vec2::ZERO),
            Body::new(1.0, Vec2::new(-2.0, 1.0), Vec2::ZERO),
        ];

        let contacts = deferred_contacts(&bodies, 0.154, 0.001);

        let kept: Vec<_> = contacts.iter().map(|&(i, j, _)| (i, j)).collect();
        assert_eq!(kept, vec![(2, 3), (4, 5)]);
        assert!(matches!(contacts[0].2, Contact::Approaching(_)));
        assert_eq!(contacts[1].2, Contact::Degenerate);
    }

    #[test]
    fn apply_changes_only_the_pair() {
        let mut bodies = vec![
            Body::new(1.0, Vec2::ZERO, Vec2::ZERO),
            Body::new(2.0, Vec2::ZERO, Vec2::ZERO),
            Body::new(3.0, Vec2::ZERO, Vec2::ONE),
        ];
        apply(&mut bodies, 0, 1, Vec2::X);
        assert_eq!(bodies[0].velocity, Vec2::new(-2.0, 0.0));
        assert_eq!(bodies[1].velocity, Vec2::new(1.0, 0.0));
        assert_eq!(bodies[2].velocity, Vec2::ONE);
    }
}
