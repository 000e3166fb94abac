use glam::{DMat4, DVec3, DVec4};

use crate::foundation::core::{Point, Viewport};

/// Perspective camera for the volumetric pages.
///
/// World units follow the usual right-handed convention: y up, the camera on +z looking at
/// the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: DVec3,
    pub target: DVec3,
    /// Vertical field of view in degrees.
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, 30.0),
            target: DVec3::ZERO,
            fov_deg: 35.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn at(position: DVec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Visible world width and height on the `z = 0` plane.
    pub fn world_viewport(&self, aspect: f64) -> (f64, f64) {
        let dist = (self.position - self.target).length();
        let h = 2.0 * dist * (self.fov_deg.to_radians() * 0.5).tan();
        (h * aspect, h)
    }

    fn view_proj(&self, aspect: f64) -> DMat4 {
        let view = DMat4::look_at_rh(self.position, self.target, DVec3::Y);
        let proj = DMat4::perspective_rh_gl(self.fov_deg.to_radians(), aspect, self.near, self.far);
        proj * view
    }

    /// Screen position of `p` and its perspective scale relative to the `z = 0` plane.
    /// `None` behind the camera.
    pub fn project(&self, p: DVec3, viewport: Viewport) -> Option<(Point, f64)> {
        let clip = self.view_proj(viewport.aspect()) * DVec4::new(p.x, p.y, p.z, 1.0);
        if clip.w <= self.near {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let x = (ndc.x + 1.0) * 0.5 * viewport.w();
        let y = (1.0 - ndc.y) * 0.5 * viewport.h();
        let focus = (self.position - self.target).length();
        Some((Point::new(x, y), focus / clip.w))
    }

    /// Pointer position mapped through normalized device coordinates onto the `z = 0` plane.
    pub fn pointer_to_world(&self, pointer: Point, viewport: Viewport) -> DVec3 {
        let ndc_x = pointer.x / viewport.w() * 2.0 - 1.0;
        let ndc_y = -(pointer.y / viewport.h()) * 2.0 + 1.0;
        let (w, h) = self.world_viewport(viewport.aspect());
        DVec3::new(ndc_x * w * 0.5, ndc_y * h * 0.5, 0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/projection.rs"]
mod tests;
