//! Pointer-driven dragging of the card.
//!
//! Two states: idle and dragging. A pointer-down that hits the card's
//! collider captures that pointer and switches the card to kinematic; only
//! the same pointer's pointer-up releases it. While dragging, the card is
//! moved each frame to the pointer's world point minus the grab offset.

use glam::{Vec2, Vec3};
use log::debug;

use crate::body::Collider;
use crate::camera::Camera;
use crate::chain::LanyardBodies;
use crate::runtime::{MotionMode, PhysicsRuntime};

/// Cursor the host should show over the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Auto,
    Grab,
    Grabbing,
}

impl CursorStyle {
    /// CSS `cursor` value.
    pub fn as_css(self) -> &'static str {
        match self {
            CursorStyle::Auto => "auto",
            CursorStyle::Grab => "grab",
            CursorStyle::Grabbing => "grabbing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Up,
    /// Pointer moved over the card.
    Enter,
    /// Pointer left the card.
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: u32,
    pub kind: PointerEventKind,
    /// Pointer position in normalized device coordinates.
    pub ndc: Vec2,
}

impl PointerEvent {
    pub fn down(pointer_id: u32, ndc: Vec2) -> Self {
        PointerEvent { pointer_id, kind: PointerEventKind::Down, ndc }
    }

    pub fn up(pointer_id: u32, ndc: Vec2) -> Self {
        PointerEvent { pointer_id, kind: PointerEventKind::Up, ndc }
    }

    pub fn enter(pointer_id: u32, ndc: Vec2) -> Self {
        PointerEvent { pointer_id, kind: PointerEventKind::Enter, ndc }
    }

    pub fn leave(pointer_id: u32, ndc: Vec2) -> Self {
        PointerEvent { pointer_id, kind: PointerEventKind::Leave, ndc }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// The captured pointer.
        pointer_id: u32,
        /// Hit point minus card position at grab time.
        grab_offset: Vec3,
    },
}

/// World point the dragged card follows for a pointer position.
///
/// Unprojects the pointer at mid depth, then walks along the view ray by the
/// camera's distance to the origin. This stands in for the real pick depth
/// and does not track the grab depth exactly.
pub fn drag_point(camera: &Camera, ndc: Vec2) -> Vec3 {
    let near = camera.unproject(ndc.extend(0.5));
    let dir = (near - camera.position).normalize_or_zero();
    near + dir * camera.position.length()
}

#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    hovered: bool,
    card_collider: Collider,
}

impl DragController {
    pub fn new(card_collider: Collider) -> Self {
        DragController {
            state: DragState::Idle,
            hovered: false,
            card_collider,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn cursor(&self) -> CursorStyle {
        match (self.hovered, self.is_dragging()) {
            (false, _) => CursorStyle::Auto,
            (true, false) => CursorStyle::Grab,
            (true, true) => CursorStyle::Grabbing,
        }
    }

    /// Route one pointer event. Returns whether the drag state changed.
    pub fn handle<R: PhysicsRuntime>(
        &mut self,
        runtime: &mut R,
        bodies: &LanyardBodies,
        camera: &Camera,
        event: &PointerEvent,
    ) -> bool {
        match event.kind {
            PointerEventKind::Down => self.pointer_down(runtime, bodies, camera, event.pointer_id, event.ndc),
            PointerEventKind::Up => self.pointer_up(runtime, bodies, event.pointer_id),
            PointerEventKind::Enter => {
                self.hovered = true;
                false
            }
            PointerEventKind::Leave => {
                self.hovered = false;
                false
            }
        }
    }

    /// Start a drag if idle and the pointer ray hits the card.
    pub fn pointer_down<R: PhysicsRuntime>(
        &mut self,
        runtime: &mut R,
        bodies: &LanyardBodies,
        camera: &Camera,
        pointer_id: u32,
        ndc: Vec2,
    ) -> bool {
        if let DragState::Dragging { pointer_id: held, .. } = self.state {
            debug!("pointer {pointer_id} ignored, card captured by pointer {held}");
            return false;
        }
        let (Some(position), Some(rotation)) = (runtime.translation(bodies.card), runtime.rotation(bodies.card)) else {
            return false;
        };
        let ray = camera.ray(ndc);
        let Some(t) = self.card_collider.cast_ray(position, rotation, &ray) else {
            return false;
        };

        let grab_offset = ray.at(t) - position;
        runtime.set_motion_mode(bodies.card, MotionMode::Kinematic);
        for body in bodies.all() {
            runtime.wake_up(body);
        }
        self.state = DragState::Dragging { pointer_id, grab_offset };
        debug!("drag started by pointer {pointer_id}, grab offset {grab_offset:?}");
        true
    }

    /// End the drag if `pointer_id` holds the capture. Velocity is left as is.
    pub fn pointer_up<R: PhysicsRuntime>(&mut self, runtime: &mut R, bodies: &LanyardBodies, pointer_id: u32) -> bool {
        match self.state {
            DragState::Dragging { pointer_id: held, .. } if held == pointer_id => {
                runtime.set_motion_mode(bodies.card, MotionMode::Dynamic);
                self.state = DragState::Idle;
                debug!("drag released by pointer {pointer_id}");
                true
            }
            _ => false,
        }
    }

    /// Queue the card's kinematic target for this frame while dragging.
    pub fn drive<R: PhysicsRuntime>(
        &self,
        runtime: &mut R,
        bodies: &LanyardBodies,
        camera: &Camera,
        pointer: Vec2,
    ) -> Option<Vec3> {
        let DragState::Dragging { grab_offset, .. } = self.state else {
            return None;
        };
        let target = drag_point(camera, pointer) - grab_offset;
        for body in bodies.all() {
            runtime.wake_up(body);
        }
        runtime.set_next_kinematic_translation(bodies.card, target);
        Some(target)
    }
}
