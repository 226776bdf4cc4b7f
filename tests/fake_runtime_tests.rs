//! Controller behaviour against a scripted runtime instead of the XPBD world.

use std::cell::Cell;
use std::rc::Rc;

use glam::{Quat, Vec2, Vec3};
use lanyard::{
    BodyDesc, BodyId, Constraint, FrameInput, Lanyard, LanyardConfig, LanyardError, MemoryAssets, MotionMode,
    PhysicsRuntime, PointerEvent,
};

#[derive(Default)]
struct FakeRuntime {
    bodies: Vec<(Vec3, MotionMode, Vec3)>,
    constraints: usize,
    /// Bodies report no pose until resolved, like a host engine still spawning them.
    /// Shared so a test can flip it after the lanyard takes ownership.
    resolved: Rc<Cell<bool>>,
    /// Overrides the card's spawn position and angular velocity.
    card_spawn: Option<(Vec3, Vec3)>,
    woken: Vec<BodyId>,
    kinematic_targets: Vec<(BodyId, Vec3)>,
    angvel_writes: usize,
    steps: usize,
}

impl FakeRuntime {
    fn get(&self, body: BodyId) -> Option<&(Vec3, MotionMode, Vec3)> {
        if self.resolved.get() {
            self.bodies.get(body.index())
        } else {
            None
        }
    }
}

impl PhysicsRuntime for FakeRuntime {
    fn add_body(&mut self, desc: BodyDesc) -> Result<BodyId, LanyardError> {
        // The card is the fifth body spawned.
        let spawn = match self.card_spawn {
            Some((position, angvel)) if self.bodies.len() == 4 => (position, desc.mode, angvel),
            _ => (desc.position, desc.mode, Vec3::ZERO),
        };
        self.bodies.push(spawn);
        Ok(BodyId::new(self.bodies.len() - 1))
    }

    fn add_constraint(&mut self, _constraint: Constraint) -> Result<(), LanyardError> {
        self.constraints += 1;
        Ok(())
    }

    fn translation(&self, body: BodyId) -> Option<Vec3> {
        self.get(body).map(|b| b.0)
    }

    fn rotation(&self, body: BodyId) -> Option<Quat> {
        self.get(body).map(|_| Quat::IDENTITY)
    }

    fn linear_velocity(&self, body: BodyId) -> Option<Vec3> {
        self.get(body).map(|_| Vec3::ZERO)
    }

    fn angular_velocity(&self, body: BodyId) -> Option<Vec3> {
        self.get(body).map(|b| b.2)
    }

    fn set_angular_velocity(&mut self, body: BodyId, velocity: Vec3) {
        self.angvel_writes += 1;
        self.bodies[body.index()].2 = velocity;
    }

    fn motion_mode(&self, body: BodyId) -> Option<MotionMode> {
        self.bodies.get(body.index()).map(|b| b.1)
    }

    fn set_motion_mode(&mut self, body: BodyId, mode: MotionMode) {
        self.bodies[body.index()].1 = mode;
    }

    fn set_next_kinematic_translation(&mut self, body: BodyId, target: Vec3) {
        self.kinematic_targets.push((body, target));
    }

    fn wake_up(&mut self, body: BodyId) {
        self.woken.push(body);
    }

    fn is_sleeping(&self, _body: BodyId) -> Option<bool> {
        Some(false)
    }

    fn step(&mut self, _dt: f32) {
        self.steps += 1;
    }
}

fn build_with(runtime: FakeRuntime) -> Lanyard<FakeRuntime> {
    let config = LanyardConfig::default();
    Lanyard::with_runtime(&config, &MemoryAssets::for_config(&config), runtime).unwrap()
}

fn build(resolved: bool) -> Lanyard<FakeRuntime> {
    build_with(FakeRuntime { resolved: Rc::new(Cell::new(resolved)), ..Default::default() })
}

#[test]
fn assembly_goes_through_the_runtime() {
    let lanyard = build(true);
    assert_eq!(lanyard.runtime().bodies.len(), 5);
    assert_eq!(lanyard.runtime().constraints, 4);
    assert_eq!(lanyard.card_mode(), Some(MotionMode::Dynamic));
    assert_eq!(lanyard.runtime().motion_mode(lanyard.bodies().anchor), Some(MotionMode::Fixed));
}

#[test]
fn unresolved_bodies_make_frames_noop() {
    let mut lanyard = build(false);
    let input = FrameInput::pointer(Vec2::ZERO).with_event(PointerEvent::down(1, Vec2::ZERO));
    let frame = lanyard.step(1.0 / 60.0, &input);

    assert!(frame.band.is_none());
    assert!(frame.card.is_none());
    assert!(!frame.dragging);
    assert_eq!(lanyard.runtime().angvel_writes, 0);
    assert_eq!(lanyard.runtime().steps, 1);
}

#[test]
fn band_appears_once_bodies_resolve() {
    let resolved = Rc::new(Cell::new(false));
    let mut lanyard = build_with(FakeRuntime { resolved: Rc::clone(&resolved), ..Default::default() });
    assert!(lanyard.step(1.0 / 60.0, &FrameInput::default()).band.is_none());

    resolved.set(true);
    let band = lanyard.step(1.0 / 60.0, &FrameInput::default()).band.unwrap();
    let link3 = lanyard.runtime().bodies[lanyard.bodies().links[2].index()].0;
    assert!(band.points[0].distance(link3) < 1e-4);
    assert_eq!(lanyard.runtime().angvel_writes, 1);
}

#[test]
fn grabbing_card_wakes_every_body_and_drives_it() {
    // Card parked in front of the camera.
    let mut lanyard = build_with(FakeRuntime {
        resolved: Rc::new(Cell::new(true)),
        card_spawn: Some((Vec3::ZERO, Vec3::ZERO)),
        ..Default::default()
    });
    let card = lanyard.bodies().card;

    let input = FrameInput::pointer(Vec2::ZERO).with_event(PointerEvent::down(7, Vec2::ZERO));
    let frame = lanyard.step(1.0 / 60.0, &input);
    assert!(frame.dragging);
    assert_eq!(lanyard.card_mode(), Some(MotionMode::Kinematic));

    let woken = &lanyard.runtime().woken;
    for id in lanyard.bodies().all() {
        assert!(woken.contains(&id), "{id:?} was not woken");
    }
    let (body, target) = lanyard.runtime().kinematic_targets[0];
    assert_eq!(body, card);
    // Hit on the front face, 0.01 in front of the card center.
    assert!(target.x.abs() < 1e-4 && target.y.abs() < 1e-4, "{target:?}");
}

#[test]
fn damper_only_touches_yaw_rate() {
    let mut lanyard = build_with(FakeRuntime {
        resolved: Rc::new(Cell::new(true)),
        card_spawn: Some((Vec3::new(10.2, 8.0, 0.0), Vec3::new(0.5, 1.0, -0.5))),
        ..Default::default()
    });
    let card = lanyard.bodies().card;
    lanyard.step(1.0 / 60.0, &FrameInput::default());
    // Identity rotation has no yaw to correct.
    assert_eq!(lanyard.runtime().bodies[card.index()].2, Vec3::new(0.5, 1.0, -0.5));
}
