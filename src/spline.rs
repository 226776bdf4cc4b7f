//! Non-uniform Catmull-Rom splines through a list of control points.
//!
//! Knot spacing follows the chord lengths between points (or their square
//! roots for centripetal parametrization), which keeps the curve from
//! cusping or overshooting when neighbouring segments differ a lot in
//! length. The curve passes through every control point.

use glam::Vec3;

/// Knot parametrization of a [`CatmullRom`] curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveType {
    /// Knots spaced by chord length.
    #[default]
    Chordal,
    /// Knots spaced by the square root of chord length.
    Centripetal,
}

impl CurveType {
    /// Exponent applied to the squared chord length.
    fn exponent(self) -> f32 {
        match self {
            CurveType::Chordal => 0.5,
            CurveType::Centripetal => 0.25,
        }
    }
}

/// Cubic `c0 + c1 t + c2 t^2 + c3 t^3` for one segment.
struct Cubic {
    c0: Vec3,
    c1: Vec3,
    c2: Vec3,
    c3: Vec3,
}

impl Cubic {
    /// Hermite form from endpoints and tangents.
    fn hermite(x0: Vec3, x1: Vec3, t0: Vec3, t1: Vec3) -> Self {
        Cubic {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn nonuniform(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, dt0: f32, dt1: f32, dt2: f32) -> Self {
        let t1 = (p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1;
        let t2 = (p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2;
        Cubic::hermite(p1, p2, t1 * dt1, t2 * dt1)
    }

    fn eval(&self, t: f32) -> Vec3 {
        self.c0 + t * (self.c1 + t * (self.c2 + t * self.c3))
    }
}

/// An open Catmull-Rom curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CatmullRom {
    pub points: Vec<Vec3>,
    pub curve_type: CurveType,
}

impl CatmullRom {
    pub fn new(points: Vec<Vec3>, curve_type: CurveType) -> Self {
        CatmullRom { points, curve_type }
    }

    /// Point at parameter `t` in [0, 1], evenly spread over segments.
    ///
    /// Missing neighbours at the ends are reflected through the endpoint.
    /// Needs at least two control points; fewer yield the single point or zero.
    pub fn point(&self, t: f32) -> Vec3 {
        let points = &self.points;
        let l = points.len();
        match l {
            0 => return Vec3::ZERO,
            1 => return points[0],
            _ => {}
        }

        let p = (l - 1) as f32 * t.clamp(0.0, 1.0);
        let mut seg = p.floor() as usize;
        let mut weight = p - seg as f32;
        if seg >= l - 1 {
            seg = l - 2;
            weight = 1.0;
        }

        let p0 = if seg > 0 { points[seg - 1] } else { 2.0 * points[0] - points[1] };
        let p1 = points[seg];
        let p2 = points[seg + 1];
        let p3 = if seg + 2 < l { points[seg + 2] } else { 2.0 * points[l - 1] - points[l - 2] };

        let pow = self.curve_type.exponent();
        let mut dt0 = p0.distance_squared(p1).powf(pow);
        let mut dt1 = p1.distance_squared(p2).powf(pow);
        let mut dt2 = p2.distance_squared(p3).powf(pow);

        // Coincident points would divide by zero.
        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }

        Cubic::nonuniform(p0, p1, p2, p3, dt0, dt1, dt2).eval(weight)
    }

    /// `count` points at evenly spaced parameters, endpoints included.
    pub fn sample(&self, count: usize) -> Vec<Vec3> {
        match count {
            0 => Vec::new(),
            1 => vec![self.point(0.0)],
            _ => (0..count)
                .map(|i| self.point(i as f32 / (count - 1) as f32))
                .collect(),
        }
    }
}
