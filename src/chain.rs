//! The lanyard chain: a fixed anchor, three rope links and the card.

use glam::Vec3;
use log::debug;

use crate::body::{BodyDesc, Collider};
use crate::config::ROPE_SEGMENT_LENGTH;
use crate::constraint::{BallConstraint, Constraint, RopeConstraint};
use crate::error::LanyardError;
use crate::runtime::{BodyId, PhysicsRuntime};

/// Configuration for creating a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainConfig {
    /// World position of the fixed anchor.
    pub origin: Vec3,
    /// Initial spacing of links and card along +X from the anchor.
    pub spacing: f32,
    /// Maximum length of each rope segment.
    pub rope_length: f32,
    pub link_radius: f32,
    pub card_half_extents: Vec3,
    /// Ball-joint anchor on the card, above its center so it hangs below the joint.
    pub card_joint_anchor: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        ChainConfig {
            origin: Vec3::new(7.0, 8.0, 0.0),
            spacing: 0.8,
            rope_length: ROPE_SEGMENT_LENGTH,
            link_radius: 0.1,
            card_half_extents: Vec3::new(1.0, 1.4, 0.01),
            card_joint_anchor: Vec3::new(0.0, 2.0, 0.0),
            linear_damping: 4.0,
            angular_damping: 4.0,
        }
    }
}

impl ChainConfig {
    /// Where body `slot` (0 = anchor, 4 = card) is placed before settling.
    pub fn initial_position(&self, slot: usize) -> Vec3 {
        self.origin + Vec3::X * (self.spacing * slot as f32)
    }

    pub fn card_collider(&self) -> Collider {
        Collider::Cuboid { half_extents: self.card_half_extents }
    }
}

/// Handles of the five bodies making up the lanyard. The topology is fixed
/// once assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanyardBodies {
    pub anchor: BodyId,
    pub links: [BodyId; 3],
    pub card: BodyId,
}

impl LanyardBodies {
    /// Spawn the bodies and join them with three ropes and a ball joint.
    ///
    /// No initial pose solve is done; gravity and the constraints settle
    /// the chain over the following steps.
    pub fn assemble<R: PhysicsRuntime>(runtime: &mut R, config: &ChainConfig) -> Result<Self, LanyardError> {
        let segment = |pos: Vec3| {
            BodyDesc::dynamic(pos)
                .with_damping(config.linear_damping, config.angular_damping)
                .with_can_sleep(true)
        };

        let anchor = runtime.add_body(BodyDesc::fixed(config.initial_position(0)))?;
        let mut links = [anchor; 3];
        for (i, link) in links.iter_mut().enumerate() {
            *link = runtime.add_body(
                segment(config.initial_position(i + 1)).with_collider(Collider::ball(config.link_radius)),
            )?;
        }
        let card = runtime.add_body(segment(config.initial_position(4)).with_collider(config.card_collider()))?;

        let mut prev = anchor;
        for &link in &links {
            runtime.add_constraint(Constraint::Rope(RopeConstraint::new(prev, link, config.rope_length)))?;
            prev = link;
        }
        runtime.add_constraint(Constraint::Ball(BallConstraint::new(
            links[2],
            card,
            Vec3::ZERO,
            config.card_joint_anchor,
        )))?;

        debug!("assembled lanyard chain at {:?}", config.origin);
        Ok(LanyardBodies { anchor, links, card })
    }

    /// Every body, anchor first.
    pub fn all(&self) -> [BodyId; 5] {
        [self.anchor, self.links[0], self.links[1], self.links[2], self.card]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::PhysicsWorld;

    #[test]
    fn assembles_five_bodies_four_constraints() {
        let mut world = PhysicsWorld::default();
        let bodies = LanyardBodies::assemble(&mut world, &ChainConfig::default()).unwrap();
        assert_eq!(world.body_count(), 5);
        assert_eq!(world.constraint_count(), 4);
        assert_eq!(bodies.all()[0], bodies.anchor);
    }

    #[test]
    fn bodies_spaced_along_x() {
        let config = ChainConfig::default();
        assert_eq!(config.initial_position(0), Vec3::new(7.0, 8.0, 0.0));
        assert!((config.initial_position(4).x - 10.2).abs() < 1e-5);
    }
}
