//! Perspective camera with OpenGL-style normalized device coordinates.

use glam::{Mat4, Quat, Vec2, Vec3};

/// A half-line in world space. `direction` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Identity looks down -Z with +Y up.
    pub rotation: Quat,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, fov_y: f32) -> Self {
        Camera {
            position,
            rotation: Quat::IDENTITY,
            fov_y,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// World point to NDC; `z` is depth in [-1, 1] between the clip planes.
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.view_projection().project_point3(world)
    }

    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.view_projection().inverse().project_point3(ndc)
    }

    /// Ray from the camera through a pointer position.
    pub fn ray(&self, ndc: Vec2) -> Ray {
        let through = self.unproject(ndc.extend(0.5));
        Ray {
            origin: self.position,
            direction: (through - self.position).normalize_or_zero(),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new(Vec3::new(0.0, 0.0, 30.0), 20.0)
    }
}
