//! Top-down orthographic camera with pan and zoom. Rotation is locked.

use glam::{Mat4, Vec2, Vec3};

use crate::interaction::ray::Ray;

/// Screen "up" maps to world -Z, screen "right" to world +X.
const SCREEN_UP: Vec3 = Vec3::NEG_Z;
const SCREEN_RIGHT: Vec3 = Vec3::X;

#[derive(Debug, Clone, PartialEq)]
pub struct OrthoCamera {
    /// Point on the ground plane the camera looks at.
    pub target: Vec3,
    /// Height of the camera above the target.
    pub height: f32,
    /// World units visible vertically at zoom 1.
    pub view_height: f32,
    /// Width / height of the viewport.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    zoom: f32,
    min_zoom: f32,
    max_zoom: f32,
}

impl OrthoCamera {
    pub fn new(view_height: f32, height: f32, zoom: f32, min_zoom: f32, max_zoom: f32) -> Self {
        let mut camera = Self {
            target: Vec3::ZERO,
            height,
            view_height,
            aspect: 1.0,
            near: 0.1,
            far: height * 2.0 + 100.0,
            zoom: 1.0,
            min_zoom,
            max_zoom,
        };
        camera.set_zoom(zoom);
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.target + Vec3::Y * self.height
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Multiply zoom by `factor`, clamped to the limits.
    pub fn zoom_by(&mut self, factor: f32) {
        self.set_zoom(self.zoom * factor);
    }

    /// Update aspect ratio (call on viewport resize).
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// Move target and camera together by `delta` in screen axes
    /// (x right, y up), in world units.
    pub fn pan(&mut self, delta: Vec2) {
        self.target += SCREEN_RIGHT * delta.x + SCREEN_UP * delta.y;
    }

    /// Half extents of the visible area in world units.
    pub fn half_extents(&self) -> Vec2 {
        let half_h = self.view_height / (2.0 * self.zoom);
        Vec2::new(half_h * self.aspect, half_h)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, SCREEN_UP)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let half = self.half_extents();
        Mat4::orthographic_rh(-half.x, half.x, -half.y, half.y, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray through a point in normalized device coordinates
    /// (x, y in [-1, 1], y up).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(near, far - near)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrthoCamera {
        OrthoCamera::new(20.0, 50.0, 1.0, 0.5, 4.0)
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = camera();
        cam.zoom_by(100.0);
        assert_eq!(cam.zoom(), 4.0);
        cam.set_zoom(0.01);
        assert_eq!(cam.zoom(), 0.5);
    }

    #[test]
    fn pan_moves_target_and_position_together() {
        let mut cam = camera();
        cam.pan(Vec2::new(2.0, 3.0));
        assert_eq!(cam.target, Vec3::new(2.0, 0.0, -3.0));
        assert_eq!(cam.position(), Vec3::new(2.0, 50.0, -3.0));
    }

    #[test]
    fn center_ray_points_down_at_target() {
        let mut cam = camera();
        cam.pan(Vec2::new(4.0, -1.0));
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        assert!((ray.direction - Vec3::NEG_Y).length() < 1e-5);
        assert!((ray.origin.x - 4.0).abs() < 1e-4);
        assert!((ray.origin.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn ndc_corners_map_to_visible_extents() {
        let mut cam = camera();
        cam.set_aspect(200.0, 100.0);
        cam.set_zoom(2.0);
        // view_height 20 at zoom 2 → 5 world units up, 10 across.
        let ray = cam.ray_from_ndc(Vec2::new(1.0, 1.0));
        assert!((ray.origin.x - 10.0).abs() < 1e-3);
        assert!((ray.origin.z + 5.0).abs() < 1e-3);
    }

    #[test]
    fn degenerate_aspect_is_ignored() {
        let mut cam = camera();
        cam.set_aspect(0.0, 100.0);
        assert_eq!(cam.aspect, 1.0);
    }
}
