//! Band ribbon synthesis: smoothed link samples, spline fit and strip geometry.

use glam::{Vec2, Vec3};

use crate::chain::LanyardBodies;
use crate::config::{BandConfig, CURVE_SAMPLES};
use crate::runtime::{BodyId, PhysicsRuntime};
use crate::spline::{CatmullRom, CurveType};

/// Lower and upper clamp on the lag distance that drives smoothing speed.
const LAG_CLAMP: (f32, f32) = (0.1, 1.0);

/// A position that chases a body's true position, faster the further behind it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedSample {
    pub position: Vec3,
}

impl SmoothedSample {
    pub fn new(position: Vec3) -> Self {
        SmoothedSample { position }
    }

    /// Move toward `target`. The blend factor is capped at 1 so the sample
    /// never passes the position it is chasing. A non-finite or non-positive
    /// `dt` leaves the sample where it is.
    pub fn update(&mut self, target: Vec3, dt: f32, speeds: &BandConfig) -> Vec3 {
        if !(dt.is_finite() && dt > 0.0) || !target.is_finite() {
            return self.position;
        }
        let lag = self.position.distance(target).clamp(LAG_CLAMP.0, LAG_CLAMP.1);
        let speed = speeds.min_speed + lag * (speeds.max_speed - speeds.min_speed);
        let t = (dt * speed).clamp(0.0, 1.0);
        self.position = self.position.lerp(target, t);
        self.position
    }
}

/// Static look of the rendered band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStyle {
    pub width: f32,
    /// Texture repeat; negative `x` mirrors the texture along the band.
    pub repeat: Vec2,
    pub color: Vec3,
    pub depth_test: bool,
}

impl Default for BandStyle {
    fn default() -> Self {
        BandStyle {
            width: 1.0,
            repeat: Vec2::new(-4.0, 1.0),
            color: Vec3::ONE,
            depth_test: false,
        }
    }
}

/// Triangle strip around the band polyline: two vertices per point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RibbonStrip {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
}

impl RibbonStrip {
    /// Widen `points` sideways, facing `eye`.
    pub fn build(points: &[Vec3], eye: Vec3, style: &BandStyle) -> Self {
        let n = points.len();
        let mut strip = RibbonStrip {
            positions: Vec::with_capacity(n * 2),
            uvs: Vec::with_capacity(n * 2),
        };
        let half = style.width * 0.5;
        for (i, &p) in points.iter().enumerate() {
            let prev = points[i.saturating_sub(1)];
            let next = points[(i + 1).min(n - 1)];
            let side = (next - prev).cross(eye - p).normalize_or_zero() * half;
            let along = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };
            let u = along * style.repeat.x;
            strip.positions.push(p - side);
            strip.positions.push(p + side);
            strip.uvs.push(Vec2::new(u, 0.0));
            strip.uvs.push(Vec2::new(u, style.repeat.y));
        }
        strip
    }
}

/// Geometry of the band for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RibbonGeometry {
    /// From the card end (link3) to the anchor.
    pub points: Vec<Vec3>,
    pub strip: RibbonStrip,
}

/// Turns resolved chain positions into a smooth ribbon every frame.
#[derive(Debug, Clone)]
pub struct BandSynthesizer {
    /// Smoothed samples keyed by link: link1 then link2.
    samples: [(BodyId, SmoothedSample); 2],
    speeds: BandConfig,
    style: BandStyle,
    sample_count: usize,
}

impl BandSynthesizer {
    /// `initial` holds the starting positions of link1 and link2.
    pub fn new(bodies: &LanyardBodies, initial: [Vec3; 2], speeds: BandConfig, style: BandStyle) -> Self {
        BandSynthesizer {
            samples: [
                (bodies.links[0], SmoothedSample::new(initial[0])),
                (bodies.links[1], SmoothedSample::new(initial[1])),
            ],
            speeds,
            style,
            sample_count: CURVE_SAMPLES,
        }
    }

    pub fn sample(&self, link: BodyId) -> Option<&SmoothedSample> {
        self.samples.iter().find(|(id, _)| *id == link).map(|(_, s)| s)
    }

    pub fn style(&self) -> &BandStyle {
        &self.style
    }

    /// Control polygon: link3, smoothed link2, smoothed link1, anchor.
    ///
    /// Returns `None` without touching any sample when a body is not resolved yet.
    pub fn update<R: PhysicsRuntime>(&mut self, runtime: &R, bodies: &LanyardBodies, dt: f32) -> Option<[Vec3; 4]> {
        let anchor = runtime.translation(bodies.anchor)?;
        let link3 = runtime.translation(bodies.links[2])?;
        let link1 = runtime.translation(self.samples[0].0)?;
        let link2 = runtime.translation(self.samples[1].0)?;

        let smoothed1 = self.samples[0].1.update(link1, dt, &self.speeds);
        let smoothed2 = self.samples[1].1.update(link2, dt, &self.speeds);
        Some([link3, smoothed2, smoothed1, anchor])
    }

    pub fn synthesize<R: PhysicsRuntime>(
        &mut self,
        runtime: &R,
        bodies: &LanyardBodies,
        dt: f32,
        eye: Vec3,
    ) -> Option<RibbonGeometry> {
        let control = self.update(runtime, bodies, dt)?;
        let points = CatmullRom::new(control.to_vec(), CurveType::Chordal).sample(self.sample_count);
        let strip = RibbonStrip::build(&points, eye, &self.style);
        Some(RibbonGeometry { points, strip })
    }
}
