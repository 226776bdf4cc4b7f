//! Yaw spring-back for the card.

use crate::config::YAW_CORRECTION_FACTOR;
use crate::runtime::{BodyId, PhysicsRuntime};

/// Steers the card's yaw rate against its current yaw so it stops spinning
/// and settles facing the camera. Pitch, roll and position are untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationDamper {
    pub factor: f32,
}

impl OrientationDamper {
    pub fn new(factor: f32) -> Self {
        OrientationDamper { factor }
    }

    /// `angvel.y -= rotation.y * factor`, where `rotation.y` is the y
    /// component of the orientation quaternion. No-op if the body is missing.
    pub fn apply<R: PhysicsRuntime>(&self, runtime: &mut R, card: BodyId) -> bool {
        let (Some(mut angvel), Some(rotation)) = (runtime.angular_velocity(card), runtime.rotation(card)) else {
            return false;
        };
        angvel.y -= rotation.y * self.factor;
        runtime.set_angular_velocity(card, angvel);
        true
    }
}

impl Default for OrientationDamper {
    fn default() -> Self {
        Self::new(YAW_CORRECTION_FACTOR)
    }
}
