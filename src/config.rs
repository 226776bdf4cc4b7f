//! Configuration types for the lanyard widget and its physics solver.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::LanyardError;

/// Fixed physics integration timestep in seconds.
pub const TIMESTEP: f32 = 1.0 / 60.0;
/// Maximum length of each rope segment in the chain.
pub const ROPE_SEGMENT_LENGTH: f32 = 2.2;
/// Lower bound of the band smoothing speed.
pub const DEFAULT_MIN_SPEED: f32 = 0.0;
/// Upper bound of the band smoothing speed.
pub const DEFAULT_MAX_SPEED: f32 = 50.0;
/// Proportional yaw spring-back applied to the card every frame.
pub const YAW_CORRECTION_FACTOR: f32 = 0.25;
/// Number of points in the rendered band polyline.
pub const CURVE_SAMPLES: usize = 32;

/// Sleeping thresholds for the rigid-body world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepConfig {
    /// Maximum linear speed for a body to count as resting.
    pub linear_threshold: f32,
    /// Maximum angular speed for a body to count as resting.
    pub angular_threshold: f32,
    /// Seconds an island must rest before it falls asleep.
    pub time_to_sleep: f32,
}

impl Default for SleepConfig {
    fn default() -> Self {
        SleepConfig {
            linear_threshold: 0.15,
            angular_threshold: 0.15,
            time_to_sleep: 0.5,
        }
    }
}

/// Configuration for the constraint solver and simulation.
///
/// # Builder Pattern
/// ```
/// use lanyard::config::SolverConfig;
/// use glam::Vec3;
///
/// let config = SolverConfig::new()
///     .with_iterations(2)
///     .with_gravity(Vec3::new(0.0, -40.0, 0.0))
///     .with_sub_steps(8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Number of constraint solver iterations per sub-step. Default: 4.
    pub iterations: usize,
    /// Gravity acceleration vector. Default: zero (no gravity).
    pub gravity: Vec3,
    /// Number of sub-steps per physics step. Higher = stiffer ropes. Default: 8.
    pub sub_steps: usize,
    /// When and how bodies fall asleep.
    pub sleep: SleepConfig,
}

impl SolverConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SolverConfig {
            iterations: 4,
            gravity: Vec3::ZERO,
            sub_steps: 8,
            sleep: SleepConfig::default(),
        }
    }

    /// Set the number of constraint iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    /// Set the gravity vector.
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the number of sub-steps.
    pub fn with_sub_steps(mut self, sub_steps: usize) -> Self {
        self.sub_steps = sub_steps.max(1);
        self
    }

    /// Set the sleeping thresholds. A negative linear threshold disables sleeping.
    pub fn with_sleep(mut self, sleep: SleepConfig) -> Self {
        self.sleep = sleep;
        self
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Speed bounds for the band's smoothed link samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BandConfig {
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Default for BandConfig {
    fn default() -> Self {
        BandConfig {
            min_speed: DEFAULT_MIN_SPEED,
            max_speed: DEFAULT_MAX_SPEED,
        }
    }
}

/// Construction-time options of the lanyard widget. Every field is optional
/// when deserialized.
///
/// ```
/// use lanyard::config::LanyardConfig;
/// use glam::Vec3;
///
/// let config = LanyardConfig::default()
///     .with_gravity(Vec3::new(0.0, -20.0, 0.0))
///     .with_transparent(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LanyardConfig {
    /// Camera position.
    pub position: Vec3,
    pub gravity: Vec3,
    /// Vertical field of view in degrees.
    pub field_of_view: f32,
    /// Clear to a fully transparent background.
    pub transparent: bool,
    pub card_texture_front: String,
    pub card_texture_back: String,
    pub card_model: String,
    pub band_texture: String,
    pub band: BandConfig,
}

impl Default for LanyardConfig {
    fn default() -> Self {
        LanyardConfig {
            position: Vec3::new(0.0, 0.0, 30.0),
            gravity: Vec3::new(0.0, -40.0, 0.0),
            field_of_view: 20.0,
            transparent: true,
            card_texture_front: "/img/lanyard-card-front.png".to_owned(),
            card_texture_back: "/img/lanyard-card-back.png".to_owned(),
            card_model: "/img/card.glb".to_owned(),
            band_texture: "/img/lanyard.png".to_owned(),
            band: BandConfig::default(),
        }
    }
}

impl LanyardConfig {
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_field_of_view(mut self, degrees: f32) -> Self {
        self.field_of_view = degrees;
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn with_card_textures(mut self, front: impl Into<String>, back: impl Into<String>) -> Self {
        self.card_texture_front = front.into();
        self.card_texture_back = back.into();
        self
    }

    pub fn with_band(mut self, band: BandConfig) -> Self {
        self.band = band;
        self
    }

    /// Check ranges that would otherwise produce NaNs deep inside the solver.
    pub fn validate(&self) -> Result<(), LanyardError> {
        if !self.position.is_finite() {
            return Err(LanyardError::InvalidConfig("camera position must be finite"));
        }
        if !self.gravity.is_finite() {
            return Err(LanyardError::InvalidConfig("gravity must be finite"));
        }
        if !(self.field_of_view > 0.0 && self.field_of_view < 180.0) {
            return Err(LanyardError::InvalidConfig("field of view must be in (0, 180) degrees"));
        }
        if self.band.min_speed < 0.0 || self.band.max_speed < self.band.min_speed {
            return Err(LanyardError::InvalidConfig("band speeds must satisfy 0 <= min <= max"));
        }
        Ok(())
    }

    /// Solver configuration derived from these options.
    pub fn solver(&self) -> SolverConfig {
        SolverConfig::new().with_gravity(self.gravity)
    }
}
