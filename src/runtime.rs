//! Narrow capability interface between the lanyard components and a physics runtime.
//!
//! The chain, drag controller, band synthesizer and damper only ever talk to a
//! [`PhysicsRuntime`]. [`PhysicsWorld`](crate::world::PhysicsWorld) is the
//! built-in implementation; tests substitute scripted fakes.
//!
//! Queries return `None` while a body reference is unresolved. Callers treat
//! that as "not ready this frame" and skip their work.

use glam::{Quat, Vec3};

use crate::body::BodyDesc;
use crate::constraint::Constraint;
use crate::error::LanyardError;

/// Opaque handle to a body owned by a runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(usize);

impl BodyId {
    pub const fn new(index: usize) -> Self {
        BodyId(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// How a body's pose is produced each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionMode {
    /// Never moves.
    Fixed,
    /// Simulated: integrated under gravity and constraints.
    #[default]
    Dynamic,
    /// User-driven: moved to an externally supplied target, infinite mass.
    Kinematic,
}

/// Everything the lanyard needs from a rigid-body runtime.
pub trait PhysicsRuntime {
    fn add_body(&mut self, desc: BodyDesc) -> Result<BodyId, LanyardError>;

    fn add_constraint(&mut self, constraint: Constraint) -> Result<(), LanyardError>;

    fn translation(&self, body: BodyId) -> Option<Vec3>;

    fn rotation(&self, body: BodyId) -> Option<Quat>;

    fn linear_velocity(&self, body: BodyId) -> Option<Vec3>;

    fn angular_velocity(&self, body: BodyId) -> Option<Vec3>;

    fn set_angular_velocity(&mut self, body: BodyId, velocity: Vec3);

    fn motion_mode(&self, body: BodyId) -> Option<MotionMode>;

    fn set_motion_mode(&mut self, body: BodyId, mode: MotionMode);

    /// Queue the position a kinematic body reaches at the end of the next step.
    fn set_next_kinematic_translation(&mut self, body: BodyId, target: Vec3);

    fn wake_up(&mut self, body: BodyId);

    fn is_sleeping(&self, body: BodyId) -> Option<bool>;

    /// Advance the simulation by one fixed step of `dt` seconds.
    fn step(&mut self, dt: f32);
}
