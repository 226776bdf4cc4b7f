//! Rigid bodies for the lanyard world: pose, velocities, mass and sleep state.

use glam::{Mat3, Quat, Vec3};

use crate::camera::Ray;
use crate::error::LanyardError;
use crate::runtime::MotionMode;

/// Density used to derive mass properties from collider shapes.
pub const DEFAULT_DENSITY: f32 = 1.0;

/// Collision shape attached to a body. Used for mass properties and picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

/// Mass and principal moments of inertia of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    pub mass: f32,
    pub principal_inertia: Vec3,
}

impl Collider {
    pub fn ball(radius: f32) -> Self {
        Collider::Ball { radius }
    }

    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Collider::Cuboid { half_extents: Vec3::new(hx, hy, hz) }
    }

    pub fn volume(&self) -> f32 {
        match *self {
            Collider::Ball { radius } => 4.0 / 3.0 * std::f32::consts::PI * radius.powi(3),
            Collider::Cuboid { half_extents: h } => 8.0 * h.x * h.y * h.z,
        }
    }

    pub fn mass_properties(&self, density: f32) -> Result<MassProperties, LanyardError> {
        let mass = self.volume() * density;
        if !(mass.is_finite() && mass > 0.0) {
            return Err(LanyardError::InvalidMass);
        }
        let principal_inertia = match *self {
            Collider::Ball { radius } => Vec3::splat(0.4 * mass * radius * radius),
            Collider::Cuboid { half_extents: h } => {
                let sq = h * h;
                Vec3::new(sq.y + sq.z, sq.x + sq.z, sq.x + sq.y) * (mass / 3.0)
            }
        };
        Ok(MassProperties { mass, principal_inertia })
    }

    /// Distance along `ray` to the first point of the shape placed at the
    /// given pose, or `None` on a miss. A ray starting inside hits at `0`.
    pub fn cast_ray(&self, position: Vec3, rotation: Quat, ray: &Ray) -> Option<f32> {
        let inv = rotation.inverse();
        let origin = inv * (ray.origin - position);
        let dir = inv * ray.direction;
        match *self {
            Collider::Ball { radius } => {
                let b = origin.dot(dir);
                let c = origin.length_squared() - radius * radius;
                let disc = b * b - c;
                if disc < 0.0 {
                    return None;
                }
                let far = -b + disc.sqrt();
                if far < 0.0 {
                    return None;
                }
                Some((-b - disc.sqrt()).max(0.0))
            }
            Collider::Cuboid { half_extents } => {
                let mut t_min = f32::NEG_INFINITY;
                let mut t_max = f32::INFINITY;
                for axis in 0..3 {
                    let (o, d, h) = (origin[axis], dir[axis], half_extents[axis]);
                    if d.abs() < 1e-8 {
                        if o.abs() > h {
                            return None;
                        }
                        continue;
                    }
                    let t1 = (-h - o) / d;
                    let t2 = (h - o) / d;
                    t_min = t_min.max(t1.min(t2));
                    t_max = t_max.min(t1.max(t2));
                }
                if t_max < t_min.max(0.0) {
                    return None;
                }
                Some(t_min.max(0.0))
            }
        }
    }
}

/// Construction parameters for a body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub position: Vec3,
    pub rotation: Quat,
    pub mode: MotionMode,
    pub collider: Option<Collider>,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub can_sleep: bool,
}

impl BodyDesc {
    pub fn fixed(position: Vec3) -> Self {
        BodyDesc { mode: MotionMode::Fixed, ..Self::dynamic(position) }
    }

    pub fn dynamic(position: Vec3) -> Self {
        BodyDesc {
            position,
            rotation: Quat::IDENTITY,
            mode: MotionMode::Dynamic,
            collider: None,
            linear_damping: 0.0,
            angular_damping: 0.0,
            can_sleep: true,
        }
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }
}

/// A rigid body integrated with substepped position-based dynamics.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub position: Vec3,
    pub prev_position: Vec3,
    pub rotation: Quat,
    pub prev_rotation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mode: MotionMode,
    pub collider: Option<Collider>,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub can_sleep: bool,
    pub sleeping: bool,
    pub sleep_timer: f32,
    inv_mass: f32,
    inv_inertia: Vec3,
    kinematic_target: Option<Vec3>,
}

impl RigidBody {
    pub fn new(desc: BodyDesc) -> Result<Self, LanyardError> {
        // Dynamic bodies without a shape get unit mass so they still respond.
        let props = match desc.collider {
            Some(collider) => collider.mass_properties(DEFAULT_DENSITY)?,
            None => MassProperties { mass: 1.0, principal_inertia: Vec3::ONE },
        };
        Ok(RigidBody {
            position: desc.position,
            prev_position: desc.position,
            rotation: desc.rotation.normalize(),
            prev_rotation: desc.rotation.normalize(),
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mode: desc.mode,
            collider: desc.collider,
            linear_damping: desc.linear_damping,
            angular_damping: desc.angular_damping,
            can_sleep: desc.can_sleep,
            sleeping: false,
            sleep_timer: 0.0,
            inv_mass: 1.0 / props.mass,
            inv_inertia: props.principal_inertia.recip(),
            kinematic_target: None,
        })
    }

    /// Inverse mass as seen by constraints; zero for fixed and kinematic bodies.
    pub fn effective_inv_mass(&self) -> f32 {
        match self.mode {
            MotionMode::Dynamic => self.inv_mass,
            MotionMode::Fixed | MotionMode::Kinematic => 0.0,
        }
    }

    /// World-space inverse inertia tensor; zero unless dynamic.
    pub fn effective_inv_inertia(&self) -> Mat3 {
        match self.mode {
            MotionMode::Dynamic => {
                let rot = Mat3::from_quat(self.rotation);
                rot * Mat3::from_diagonal(self.inv_inertia) * rot.transpose()
            }
            MotionMode::Fixed | MotionMode::Kinematic => Mat3::ZERO,
        }
    }

    pub fn set_mode(&mut self, mode: MotionMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.kinematic_target = None;
        if mode == MotionMode::Fixed {
            self.linear_velocity = Vec3::ZERO;
            self.angular_velocity = Vec3::ZERO;
        }
    }

    pub fn set_kinematic_target(&mut self, target: Vec3) {
        self.kinematic_target = Some(target);
    }

    pub fn kinematic_target(&self) -> Option<Vec3> {
        self.kinematic_target
    }

    /// Turn a queued kinematic target into a velocity for the coming step.
    pub fn begin_step(&mut self, dt: f32) {
        if self.mode != MotionMode::Kinematic {
            return;
        }
        self.angular_velocity = Vec3::ZERO;
        self.linear_velocity = match self.kinematic_target {
            Some(target) => (target - self.position) / dt,
            None => Vec3::ZERO,
        };
    }

    /// Land exactly on the kinematic target after the last sub-step.
    pub fn end_step(&mut self) {
        if let Some(target) = self.kinematic_target.take() {
            if self.mode == MotionMode::Kinematic {
                self.position = target;
            }
        }
    }

    pub fn integrate(&mut self, h: f32, gravity: Vec3) {
        self.prev_position = self.position;
        self.prev_rotation = self.rotation;
        match self.mode {
            MotionMode::Fixed => return,
            MotionMode::Dynamic => {
                self.linear_velocity += gravity * h;
                self.linear_velocity *= 1.0 / (1.0 + h * self.linear_damping);
                self.angular_velocity *= 1.0 / (1.0 + h * self.angular_damping);
            }
            MotionMode::Kinematic => {}
        }
        self.position += self.linear_velocity * h;
        let w = self.angular_velocity;
        let spin = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * self.rotation;
        self.rotation = (self.rotation + spin * (0.5 * h)).normalize();
    }

    /// Derive velocities from the positional change made during a sub-step.
    pub fn update_velocity(&mut self, h: f32) {
        if self.mode != MotionMode::Dynamic {
            return;
        }
        self.linear_velocity = (self.position - self.prev_position) / h;
        let dq = self.rotation * self.prev_rotation.inverse();
        let w = Vec3::new(dq.x, dq.y, dq.z) * (2.0 / h);
        self.angular_velocity = if dq.w >= 0.0 { w } else { -w };
    }

    /// Apply a positional correction `impulse` at world offset `r` from the center of mass.
    pub fn apply_positional_impulse(&mut self, impulse: Vec3, r: Vec3) {
        if self.mode != MotionMode::Dynamic {
            return;
        }
        self.position += impulse * self.inv_mass;
        let dw = self.effective_inv_inertia() * r.cross(impulse);
        let spin = Quat::from_xyzw(dw.x, dw.y, dw.z, 0.0) * self.rotation;
        self.rotation = (self.rotation + spin * 0.5).normalize();
    }

    /// Generalized inverse mass when correcting at offset `r` along unit `n`.
    pub fn generalized_inv_mass(&self, r: Vec3, n: Vec3) -> f32 {
        let rn = r.cross(n);
        self.effective_inv_mass() + rn.dot(self.effective_inv_inertia() * rn)
    }

    pub fn is_resting(&self, linear: f32, angular: f32) -> bool {
        self.linear_velocity.length() < linear && self.angular_velocity.length() < angular
    }

    pub fn sleep(&mut self) {
        self.sleeping = true;
        self.linear_velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }

    pub fn wake_up(&mut self) {
        self.sleeping = false;
        self.sleep_timer = 0.0;
    }

    /// World-space position of a point given in body-local coordinates.
    pub fn world_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }
}
