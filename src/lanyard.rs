//! The lanyard widget: one simulation owned by one controller, stepped once per host frame.

use glam::{Quat, Vec2, Vec3};
use log::{debug, trace};

use crate::band::{BandSynthesizer, RibbonGeometry};
use crate::camera::Camera;
use crate::chain::{ChainConfig, LanyardBodies};
use crate::clock::FixedClock;
use crate::config::LanyardConfig;
use crate::damper::OrientationDamper;
use crate::drag::{CursorStyle, DragController, DragState, PointerEvent};
use crate::error::LanyardError;
use crate::runtime::{MotionMode, PhysicsRuntime};
use crate::scene::{AssetSource, SceneAssets, SceneDescription};
use crate::world::PhysicsWorld;

/// Host input for one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Current pointer position in normalized device coordinates.
    pub pointer: Vec2,
    /// Camera to use this frame; the configured camera when `None`.
    pub camera: Option<Camera>,
    /// Pointer events since the previous frame, in order.
    pub events: Vec<PointerEvent>,
}

impl FrameInput {
    pub fn pointer(pointer: Vec2) -> Self {
        FrameInput { pointer, ..Default::default() }
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn with_event(mut self, event: PointerEvent) -> Self {
        self.events.push(event);
        self
    }
}

/// Pose of the card body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPose {
    pub position: Vec3,
    pub rotation: Quat,
}

/// What the host should draw and do after a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    /// `None` until every chain body has a resolved position.
    pub band: Option<RibbonGeometry>,
    pub card: Option<CardPose>,
    /// Cursor directive for the host document.
    pub cursor: CursorStyle,
    pub dragging: bool,
    /// Fixed physics steps run this frame.
    pub physics_steps: u32,
}

/// The lanyard simulation and everything that drives it.
pub struct Lanyard<R: PhysicsRuntime = PhysicsWorld> {
    runtime: R,
    bodies: LanyardBodies,
    drag: DragController,
    band: BandSynthesizer,
    damper: OrientationDamper,
    clock: FixedClock,
    scene: SceneDescription,
}

impl Lanyard<PhysicsWorld> {
    /// Load assets and build the lanyard on the built-in physics world.
    pub fn new<S: AssetSource + ?Sized>(config: &LanyardConfig, assets: &S) -> Result<Self, LanyardError> {
        config.validate()?;
        let runtime = PhysicsWorld::new(config.solver());
        Self::with_runtime(config, assets, runtime)
    }
}

impl<R: PhysicsRuntime> Lanyard<R> {
    /// Build on a caller-supplied runtime. Assets load before any body is
    /// created; a load failure leaves nothing half-built.
    pub fn with_runtime<S: AssetSource + ?Sized>(
        config: &LanyardConfig,
        assets: &S,
        mut runtime: R,
    ) -> Result<Self, LanyardError> {
        config.validate()?;
        let assets = SceneAssets::load(assets, config)?;
        let scene = SceneDescription::compose(config, &assets);

        let chain = ChainConfig::default();
        let bodies = LanyardBodies::assemble(&mut runtime, &chain)?;
        let initial = [
            runtime.translation(bodies.links[0]).unwrap_or(chain.initial_position(1)),
            runtime.translation(bodies.links[1]).unwrap_or(chain.initial_position(2)),
        ];
        let band = BandSynthesizer::new(&bodies, initial, config.band, scene.band_style);
        debug!("lanyard ready, camera at {:?}", config.position);

        Ok(Lanyard {
            runtime,
            bodies,
            drag: DragController::new(chain.card_collider()),
            band,
            damper: OrientationDamper::default(),
            clock: FixedClock::default(),
            scene,
        })
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn bodies(&self) -> &LanyardBodies {
        &self.bodies
    }

    pub fn scene(&self) -> &SceneDescription {
        &self.scene
    }

    pub fn band(&self) -> &BandSynthesizer {
        &self.band
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn card_mode(&self) -> Option<MotionMode> {
        self.runtime.motion_mode(self.bodies.card)
    }

    pub fn card_pose(&self) -> Option<CardPose> {
        Some(CardPose {
            position: self.runtime.translation(self.bodies.card)?,
            rotation: self.runtime.rotation(self.bodies.card)?,
        })
    }

    pub fn cursor(&self) -> CursorStyle {
        self.drag.cursor()
    }

    /// Route a pointer event outside of [`step`](Self::step). Returns whether
    /// the drag state changed.
    pub fn handle_pointer(&mut self, event: &PointerEvent, camera: Option<&Camera>) -> bool {
        let camera = camera.copied().unwrap_or(self.scene.camera);
        self.drag.handle(&mut self.runtime, &self.bodies, &camera, event)
    }

    /// Advance one host frame of `delta` seconds.
    ///
    /// Events are routed first, then the drag target is queued, physics runs
    /// in fixed steps, the band is rebuilt and the card's yaw is damped. Any
    /// part whose bodies are not resolved yet is skipped.
    pub fn step(&mut self, delta: f32, input: &FrameInput) -> RenderState {
        let camera = input.camera.unwrap_or(self.scene.camera);

        for event in &input.events {
            self.drag.handle(&mut self.runtime, &self.bodies, &camera, event);
        }

        self.drag.drive(&mut self.runtime, &self.bodies, &camera, input.pointer);

        let steps = self.clock.advance(delta);
        for _ in 0..steps {
            self.runtime.step(self.clock.timestep());
        }

        let band = self.band.synthesize(&self.runtime, &self.bodies, delta, camera.position);
        if band.is_some() {
            self.damper.apply(&mut self.runtime, self.bodies.card);
        } else {
            trace!("chain not resolved yet, skipping band and damper");
        }

        RenderState {
            band,
            card: self.card_pose(),
            cursor: self.drag.cursor(),
            dragging: self.drag.is_dragging(),
            physics_steps: steps,
        }
    }
}
