//! Position-level constraints between rigid bodies: rope limits and ball joints.

use glam::Vec3;

use crate::body::RigidBody;
use crate::runtime::BodyId;

/// Separations below this are treated as already satisfied.
const EPSILON: f32 = 1e-9;

/// A constraint that can be applied to a pair of bodies.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Rope(RopeConstraint),
    Ball(BallConstraint),
}

/// One-sided distance limit: the anchors may come closer than
/// `max_length` but are never pulled further apart.
#[derive(Debug, Clone, PartialEq)]
pub struct RopeConstraint {
    pub a: BodyId,
    pub b: BodyId,
    pub local_anchor_a: Vec3,
    pub local_anchor_b: Vec3,
    pub max_length: f32,
}

/// Spherical joint: keeps one local point on each body coincident and
/// leaves all three rotational degrees of freedom free.
#[derive(Debug, Clone, PartialEq)]
pub struct BallConstraint {
    pub a: BodyId,
    pub b: BodyId,
    pub local_anchor_a: Vec3,
    pub local_anchor_b: Vec3,
}

impl RopeConstraint {
    /// Rope between body origins.
    pub fn new(a: BodyId, b: BodyId, max_length: f32) -> Self {
        RopeConstraint { a, b, local_anchor_a: Vec3::ZERO, local_anchor_b: Vec3::ZERO, max_length }
    }
}

impl BallConstraint {
    pub fn new(a: BodyId, b: BodyId, local_anchor_a: Vec3, local_anchor_b: Vec3) -> Self {
        BallConstraint { a, b, local_anchor_a, local_anchor_b }
    }
}

impl Constraint {
    pub fn bodies(&self) -> [BodyId; 2] {
        match self {
            Constraint::Rope(c) => [c.a, c.b],
            Constraint::Ball(c) => [c.a, c.b],
        }
    }

    fn anchors(&self) -> [Vec3; 2] {
        match self {
            Constraint::Rope(c) => [c.local_anchor_a, c.local_anchor_b],
            Constraint::Ball(c) => [c.local_anchor_a, c.local_anchor_b],
        }
    }

    /// Slack allowed between the anchors.
    fn max_separation(&self) -> f32 {
        match self {
            Constraint::Rope(c) => c.max_length,
            Constraint::Ball(_) => 0.0,
        }
    }

    /// How far the anchors currently exceed the allowed separation.
    pub fn violation(&self, bodies: &[RigidBody]) -> f32 {
        let [a, b] = self.bodies();
        let [la, lb] = self.anchors();
        let pa = bodies[a.index()].world_point(la);
        let pb = bodies[b.index()].world_point(lb);
        (pa.distance(pb) - self.max_separation()).max(0.0)
    }

    /// Project both bodies back onto the constraint manifold.
    ///
    /// Indices must be valid and distinct; [`PhysicsWorld`](crate::world::PhysicsWorld)
    /// checks this when the constraint is added.
    pub fn solve(&self, bodies: &mut [RigidBody]) {
        let [a, b] = self.bodies();
        let [la, lb] = self.anchors();
        let (body_a, body_b) = pair_mut(bodies, a.index(), b.index());

        let pa = body_a.world_point(la);
        let pb = body_b.world_point(lb);
        let delta = pb - pa;
        let dist = delta.length();
        let error = dist - self.max_separation();
        if error <= 0.0 || dist < EPSILON {
            return;
        }

        let n = delta / dist;
        let ra = pa - body_a.position;
        let rb = pb - body_b.position;
        let w = body_a.generalized_inv_mass(ra, n) + body_b.generalized_inv_mass(rb, n);
        if w < EPSILON {
            return; // both immovable
        }

        let impulse = n * (error / w);
        body_a.apply_positional_impulse(impulse, ra);
        body_b.apply_positional_impulse(-impulse, rb);
    }
}

fn pair_mut(bodies: &mut [RigidBody], a: usize, b: usize) -> (&mut RigidBody, &mut RigidBody) {
    if a < b {
        let (lo, hi) = bodies.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = bodies.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}
