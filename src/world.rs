//! Substepped XPBD rigid-body world implementing [`PhysicsRuntime`].

use glam::{Quat, Vec3};
use log::{debug, trace, warn};

use crate::body::{BodyDesc, RigidBody};
use crate::config::SolverConfig;
use crate::constraint::Constraint;
use crate::error::LanyardError;
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::runtime::{BodyId, MotionMode, PhysicsRuntime};

/// Rigid bodies plus the constraints joining them.
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    bodies: Vec<RigidBody>,
    constraints: Vec<Constraint>,
    config: SolverConfig,
}

impl PhysicsWorld {
    pub fn new(config: SolverConfig) -> Self {
        PhysicsWorld {
            bodies: Vec::new(),
            constraints: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SolverConfig {
        &mut self.config
    }

    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.get(id.index())
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(id.index())
    }

    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Largest amount by which any constraint is currently exceeded.
    pub fn max_violation(&self) -> f32 {
        self.constraints
            .iter()
            .map(|c| c.violation(&self.bodies))
            .fold(0.0, f32::max)
    }

    pub fn step_with_observer<O: StepObserver>(&mut self, dt: f32, observer: &mut O) {
        if !(dt.is_finite() && dt > 0.0) {
            warn!("ignoring physics step with invalid dt {dt}");
            return;
        }

        let islands = self.islands();
        self.propagate_wake(&islands);

        for body in self.bodies.iter_mut().filter(|b| !b.sleeping) {
            body.begin_step(dt);
        }

        let sub_steps = self.config.sub_steps.max(1);
        let h = dt / sub_steps as f32;
        let gravity = self.config.gravity;

        for sub in 0..sub_steps {
            for body in self.bodies.iter_mut().filter(|b| !b.sleeping) {
                body.integrate(h, gravity);
            }
            observer.on_integrate(sub);

            for i in 0..self.config.iterations {
                for constraint in &self.constraints {
                    let [a, b] = constraint.bodies();
                    if self.bodies[a.index()].sleeping || self.bodies[b.index()].sleeping {
                        continue;
                    }
                    constraint.solve(&mut self.bodies);
                }
                observer.on_constraint_iteration(i);
            }

            for body in self.bodies.iter_mut().filter(|b| !b.sleeping) {
                body.update_velocity(h);
            }
        }

        for body in self.bodies.iter_mut() {
            body.end_step();
        }

        self.update_sleeping(dt, &islands, observer);
        trace!("stepped {} bodies by {dt}s, max violation {}", self.bodies.len(), self.max_violation());
        observer.on_step_complete();
    }

    /// Island root per body. Fixed bodies never join an island, so a
    /// resting chain can sleep while hanging off a static anchor.
    fn islands(&self) -> Vec<usize> {
        let mut parent: Vec<usize> = (0..self.bodies.len()).collect();
        fn find(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }
        for constraint in &self.constraints {
            let [a, b] = constraint.bodies();
            if self.bodies[a.index()].mode == MotionMode::Fixed
                || self.bodies[b.index()].mode == MotionMode::Fixed
            {
                continue;
            }
            let ra = find(&mut parent, a.index());
            let rb = find(&mut parent, b.index());
            parent[ra] = rb;
        }
        (0..self.bodies.len()).map(|i| find(&mut parent, i)).collect()
    }

    /// An island with any awake member wakes as a whole.
    fn propagate_wake(&mut self, islands: &[usize]) {
        let awake_roots: Vec<usize> = self
            .bodies
            .iter()
            .zip(islands)
            .filter(|(b, _)| b.mode != MotionMode::Fixed && !b.sleeping)
            .map(|(_, &root)| root)
            .collect();
        for (body, root) in self.bodies.iter_mut().zip(islands) {
            if body.sleeping && awake_roots.contains(root) {
                body.wake_up();
            }
        }
    }

    fn update_sleeping<O: StepObserver>(&mut self, dt: f32, islands: &[usize], observer: &mut O) {
        let sleep = self.config.sleep;
        if sleep.linear_threshold < 0.0 {
            return;
        }

        for body in self.bodies.iter_mut() {
            if body.mode == MotionMode::Fixed || body.sleeping {
                continue;
            }
            if body.can_sleep && body.is_resting(sleep.linear_threshold, sleep.angular_threshold) {
                body.sleep_timer += dt;
            } else {
                body.sleep_timer = 0.0;
            }
        }

        let mut restless: Vec<usize> = Vec::new();
        for (body, &root) in self.bodies.iter().zip(islands) {
            if body.mode != MotionMode::Fixed && !body.sleeping && body.sleep_timer < sleep.time_to_sleep {
                restless.push(root);
            }
        }

        for (i, body) in self.bodies.iter_mut().enumerate() {
            if body.mode == MotionMode::Fixed || body.sleeping || restless.contains(&islands[i]) {
                continue;
            }
            body.sleep();
            debug!("body {i} fell asleep");
            observer.on_sleep(BodyId::new(i));
        }
    }

    fn check(&self, id: BodyId) -> Result<(), LanyardError> {
        if id.index() < self.bodies.len() {
            Ok(())
        } else {
            Err(LanyardError::UnknownBody { id, count: self.bodies.len() })
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl PhysicsRuntime for PhysicsWorld {
    fn add_body(&mut self, desc: BodyDesc) -> Result<BodyId, LanyardError> {
        let body = RigidBody::new(desc)?;
        let id = BodyId::new(self.bodies.len());
        self.bodies.push(body);
        Ok(id)
    }

    fn add_constraint(&mut self, constraint: Constraint) -> Result<(), LanyardError> {
        let [a, b] = constraint.bodies();
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(LanyardError::SelfConstraint(a));
        }
        self.constraints.push(constraint);
        Ok(())
    }

    fn translation(&self, body: BodyId) -> Option<Vec3> {
        self.body(body).map(|b| b.position)
    }

    fn rotation(&self, body: BodyId) -> Option<Quat> {
        self.body(body).map(|b| b.rotation)
    }

    fn linear_velocity(&self, body: BodyId) -> Option<Vec3> {
        self.body(body).map(|b| b.linear_velocity)
    }

    fn angular_velocity(&self, body: BodyId) -> Option<Vec3> {
        self.body(body).map(|b| b.angular_velocity)
    }

    fn set_angular_velocity(&mut self, body: BodyId, velocity: Vec3) {
        if let Some(b) = self.body_mut(body) {
            if b.mode != MotionMode::Fixed {
                b.angular_velocity = velocity;
            }
        }
    }

    fn motion_mode(&self, body: BodyId) -> Option<MotionMode> {
        self.body(body).map(|b| b.mode)
    }

    fn set_motion_mode(&mut self, body: BodyId, mode: MotionMode) {
        if let Some(b) = self.body_mut(body) {
            b.set_mode(mode);
            b.wake_up();
        }
    }

    fn set_next_kinematic_translation(&mut self, body: BodyId, target: Vec3) {
        match self.body_mut(body) {
            Some(b) if b.mode == MotionMode::Kinematic => {
                b.set_kinematic_target(target);
                b.wake_up();
            }
            Some(_) => warn!("kinematic target set on non-kinematic body {body:?}"),
            None => {}
        }
    }

    fn wake_up(&mut self, body: BodyId) {
        if let Some(b) = self.body_mut(body) {
            b.wake_up();
        }
    }

    fn is_sleeping(&self, body: BodyId) -> Option<bool> {
        self.body(body).map(|b| b.sleeping)
    }

    fn step(&mut self, dt: f32) {
        self.step_with_observer(dt, &mut NoOpStepObserver);
    }
}
