//! Interactive lanyard badge simulation.
//!
//! `lanyard` simulates a card hanging from a rope: a fixed anchor, three
//! link bodies joined by rope (maximum-distance) constraints, and a card
//! attached to the last link by a ball joint. The card can be grabbed and
//! dragged with a pointer, and every frame the rope is re-synthesized as a
//! smooth textured ribbon.
//!
//! # Features
//!
//! - **Rigid-body chain**: substepped XPBD world with rope limits, ball joints and sleeping
//! - **Capability seam**: components talk to a [`PhysicsRuntime`], so any engine (or a test fake) can drive them
//! - **Drag control**: pointer capture, ray picking against the card, kinematic following
//! - **Band synthesis**: speed-clamped smoothing and a chordal Catmull-Rom fit into a 32-point ribbon
//! - **Deterministic stepping**: `step(delta, input) -> RenderState`, no host callbacks
//! - **Observable**: monitor physics steps via the `StepObserver` trait
//!
//! ```
//! use lanyard::{FrameInput, Lanyard, LanyardConfig, MemoryAssets};
//! use glam::Vec2;
//!
//! let config = LanyardConfig::default();
//! let mut lanyard = Lanyard::new(&config, &MemoryAssets::for_config(&config)).unwrap();
//! let frame = lanyard.step(1.0 / 60.0, &FrameInput::pointer(Vec2::ZERO));
//! assert_eq!(frame.band.unwrap().points.len(), 32);
//! ```

pub mod band;
pub mod body;
pub mod camera;
pub mod chain;
pub mod clock;
pub mod config;
pub mod constraint;
pub mod damper;
pub mod drag;
pub mod error;
pub mod lanyard;
pub mod observer;
pub mod runtime;
pub mod scene;
pub mod spline;
pub mod world;

// Re-export primary API
pub use band::{BandStyle, BandSynthesizer, RibbonGeometry, RibbonStrip, SmoothedSample};
pub use body::{BodyDesc, Collider, RigidBody};
pub use camera::{Camera, Ray};
pub use chain::{ChainConfig, LanyardBodies};
pub use clock::FixedClock;
pub use config::{BandConfig, LanyardConfig, SleepConfig, SolverConfig};
pub use constraint::{BallConstraint, Constraint, RopeConstraint};
pub use damper::OrientationDamper;
pub use drag::{CursorStyle, DragController, DragState, PointerEvent, PointerEventKind};
pub use error::LanyardError;
pub use lanyard::{CardPose, FrameInput, Lanyard, RenderState};
pub use observer::{NoOpStepObserver, StepObserver};
pub use runtime::{BodyId, MotionMode, PhysicsRuntime};
pub use scene::{AssetSource, CardModel, MemoryAssets, SceneAssets, SceneDescription};
pub use spline::{CatmullRom, CurveType};
pub use world::PhysicsWorld;
