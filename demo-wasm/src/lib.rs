use glam::Vec2;
use lanyard::{Camera, FrameInput, Lanyard, LanyardConfig, MemoryAssets, PointerEvent};
use wasm_bindgen::prelude::*;

// ---- Lanyard Demo ----

/// Browser-facing lanyard. Pointer coordinates are normalized device
/// coordinates in [-1, 1].
#[wasm_bindgen]
pub struct LanyardDemo {
    lanyard: Lanyard,
    camera: Camera,
    events: Vec<PointerEvent>,
}

#[wasm_bindgen]
impl LanyardDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(aspect: f32) -> Result<LanyardDemo, JsValue> {
        let config = LanyardConfig::default();
        let lanyard =
            Lanyard::new(&config, &MemoryAssets::for_config(&config)).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let camera = lanyard.scene().camera.with_aspect(aspect);
        Ok(LanyardDemo { lanyard, camera, events: Vec::new() })
    }

    pub fn resize(&mut self, aspect: f32) {
        self.camera = self.camera.with_aspect(aspect);
    }

    pub fn pointer_down(&mut self, id: u32, x: f32, y: f32) {
        self.events.push(PointerEvent::down(id, Vec2::new(x, y)));
    }

    pub fn pointer_up(&mut self, id: u32, x: f32, y: f32) {
        self.events.push(PointerEvent::up(id, Vec2::new(x, y)));
    }

    pub fn pointer_enter(&mut self, id: u32, x: f32, y: f32) {
        self.events.push(PointerEvent::enter(id, Vec2::new(x, y)));
    }

    pub fn pointer_leave(&mut self, id: u32, x: f32, y: f32) {
        self.events.push(PointerEvent::leave(id, Vec2::new(x, y)));
    }

    /// Advance one frame. Returns flat [x0, y0, z0, x1, ...] band points,
    /// empty until the chain is resolved.
    pub fn frame(&mut self, dt: f32, x: f32, y: f32) -> Vec<f32> {
        let input = FrameInput {
            pointer: Vec2::new(x, y),
            camera: Some(self.camera),
            events: std::mem::take(&mut self.events),
        };
        let state = self.lanyard.step(dt, &input);
        let Some(band) = state.band else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(band.points.len() * 3);
        for p in &band.points {
            out.extend_from_slice(&[p.x, p.y, p.z]);
        }
        out
    }

    /// Returns [x, y, z, qx, qy, qz, qw] of the card, empty if unresolved.
    pub fn card_pose(&self) -> Vec<f32> {
        match self.lanyard.card_pose() {
            Some(pose) => {
                let (p, q) = (pose.position, pose.rotation);
                vec![p.x, p.y, p.z, q.x, q.y, q.z, q.w]
            }
            None => Vec::new(),
        }
    }

    /// CSS cursor value for the canvas.
    pub fn cursor(&self) -> String {
        self.lanyard.cursor().as_css().to_owned()
    }

    pub fn is_dragging(&self) -> bool {
        self.lanyard.drag_state() != lanyard::DragState::Idle
    }
}
