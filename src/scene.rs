//! Scene composition: assets, card visuals, lighting and camera.
//!
//! Everything here is computed once at construction and handed to the host
//! renderer as plain data. Assets are loaded up front; any failure aborts
//! construction so the widget never simulates without a card to show.

use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, PI};

use glam::{Quat, Vec2, Vec3};
use log::warn;

use crate::band::BandStyle;
use crate::camera::Camera;
use crate::config::LanyardConfig;
use crate::error::LanyardError;

/// Face planes cover this share of the card mesh bounds.
const FACE_INSET: f32 = 0.92;

/// Axis-aligned bounds of a mesh in its local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Bounds { min, max }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.max + self.min) * 0.5
    }
}

/// The loaded card model. Only its bounds matter to the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct CardModel {
    pub card_bounds: Bounds,
}

/// A decoded texture, shared read-only after load.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

/// Where the widget's static resources come from.
pub trait AssetSource {
    fn load_card_model(&self, id: &str) -> Result<CardModel, LanyardError>;

    fn load_texture(&self, id: &str) -> Result<Texture, LanyardError>;
}

/// In-memory asset source keyed by resource identifier.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    models: HashMap<String, CardModel>,
    textures: HashMap<String, Texture>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, id: impl Into<String>, model: CardModel) -> Self {
        self.models.insert(id.into(), model);
        self
    }

    pub fn with_texture(mut self, id: impl Into<String>, width: u32, height: u32) -> Self {
        let id = id.into();
        self.textures.insert(id.clone(), Texture { id, width, height });
        self
    }

    /// Every resource `config` names, with a standard card model.
    pub fn for_config(config: &LanyardConfig) -> Self {
        let card = CardModel {
            card_bounds: Bounds::new(Vec3::new(-0.36, -0.5, -0.005), Vec3::new(0.36, 0.5, 0.005)),
        };
        MemoryAssets::new()
            .with_model(&config.card_model, card)
            .with_texture(&config.band_texture, 512, 64)
            .with_texture(&config.card_texture_front, 720, 1000)
            .with_texture(&config.card_texture_back, 720, 1000)
    }
}

fn not_found(resource: &str) -> LanyardError {
    LanyardError::AssetLoad {
        resource: resource.to_owned(),
        reason: "not found".to_owned(),
    }
}

impl AssetSource for MemoryAssets {
    fn load_card_model(&self, id: &str) -> Result<CardModel, LanyardError> {
        self.models.get(id).cloned().ok_or_else(|| not_found(id))
    }

    fn load_texture(&self, id: &str) -> Result<Texture, LanyardError> {
        self.textures.get(id).cloned().ok_or_else(|| not_found(id))
    }
}

/// All resources the widget needs, loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneAssets {
    pub card_model: CardModel,
    pub band_texture: Texture,
    pub card_front: Texture,
    pub card_back: Texture,
}

impl SceneAssets {
    pub fn load<S: AssetSource + ?Sized>(source: &S, config: &LanyardConfig) -> Result<Self, LanyardError> {
        Ok(SceneAssets {
            card_model: source.load_card_model(&config.card_model)?,
            band_texture: source.load_texture(&config.band_texture)?,
            card_front: source.load_texture(&config.card_texture_front)?,
            card_back: source.load_texture(&config.card_texture_back)?,
        })
    }
}

/// Size and center of the printable area of the card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardFace {
    pub width: f32,
    pub height: f32,
    pub center: Vec2,
}

impl CardFace {
    pub fn from_bounds(bounds: &Bounds) -> Result<Self, LanyardError> {
        let size = bounds.size();
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(LanyardError::DegenerateGeometry { width: size.x, height: size.y });
        }
        Ok(CardFace {
            width: size.x,
            height: size.y,
            center: bounds.center().truncate(),
        })
    }
}

/// A textured quad on one side of the card.
#[derive(Debug, Clone, PartialEq)]
pub struct FacePlane {
    pub texture: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub size: Vec2,
}

/// Card meshes, placed relative to the card body.
#[derive(Debug, Clone, PartialEq)]
pub struct CardVisual {
    pub scale: f32,
    pub offset: Vec3,
    /// Empty when the card bounds are degenerate.
    pub faces: Vec<FacePlane>,
}

impl CardVisual {
    pub fn new(model: &CardModel, front: &Texture, back: &Texture) -> Self {
        let faces = match CardFace::from_bounds(&model.card_bounds) {
            Ok(face) => {
                let size = Vec2::new(face.width, face.height) * FACE_INSET;
                vec![
                    FacePlane {
                        texture: front.id.clone(),
                        position: face.center.extend(0.01),
                        rotation: Quat::IDENTITY,
                        size,
                    },
                    FacePlane {
                        texture: back.id.clone(),
                        position: face.center.extend(-0.01),
                        rotation: Quat::from_rotation_y(PI),
                        size,
                    },
                ]
            }
            Err(err) => {
                warn!("skipping card face planes: {err}");
                Vec::new()
            }
        };
        CardVisual {
            scale: 2.8,
            offset: Vec3::new(0.0, -1.5, -0.05),
            faces,
        }
    }
}

/// Emissive panel of the environment map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lightformer {
    pub intensity: f32,
    pub color: Vec3,
    pub position: Vec3,
    /// XYZ Euler angles in radians.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Lightformer {
    fn white(intensity: f32, position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Lightformer { intensity, color: Vec3::ONE, position, rotation, scale }
    }
}

fn studio_lightformers() -> Vec<Lightformer> {
    let strip = Vec3::new(100.0, 0.1, 1.0);
    let tilt = Vec3::new(0.0, 0.0, FRAC_PI_3);
    vec![
        Lightformer::white(2.0, Vec3::new(0.0, -1.0, 5.0), tilt, strip),
        Lightformer::white(3.0, Vec3::new(-1.0, -1.0, 1.0), tilt, strip),
        Lightformer::white(3.0, Vec3::new(1.0, 1.0, 1.0), tilt, strip),
        Lightformer::white(
            10.0,
            Vec3::new(-10.0, 0.0, 14.0),
            Vec3::new(0.0, FRAC_PI_2, FRAC_PI_3),
            Vec3::new(100.0, 10.0, 1.0),
        ),
    ]
}

/// Everything the host renderer draws besides the per-frame band.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    pub camera: Camera,
    /// Alpha of the black clear colour.
    pub clear_alpha: f32,
    pub ambient_intensity: f32,
    pub environment_blur: f32,
    pub lightformers: Vec<Lightformer>,
    pub card: CardVisual,
    pub band_texture: String,
    pub band_style: BandStyle,
}

impl SceneDescription {
    pub fn compose(config: &LanyardConfig, assets: &SceneAssets) -> Self {
        SceneDescription {
            camera: Camera::new(config.position, config.field_of_view),
            clear_alpha: if config.transparent { 0.0 } else { 1.0 },
            ambient_intensity: PI,
            environment_blur: 0.75,
            lightformers: studio_lightformers(),
            card: CardVisual::new(&assets.card_model, &assets.card_front, &assets.card_back),
            band_texture: assets.band_texture.id.clone(),
            band_style: BandStyle::default(),
        }
    }
}
