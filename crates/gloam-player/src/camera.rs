//! First-person camera view
//!
//! Carries the eye pose the host engine renders from and offers the
//! world-to-screen projection the wheel gesture needs for its pivot.

use glam::{Mat4, Quat, Vec2, Vec3, Vec4Swizzles};

/// Eye pose and projection parameters of the player camera
#[derive(Debug, Clone, Copy)]
pub struct CameraView {
    pub position: Vec3,
    /// Yaw rotation in radians (horizontal)
    pub yaw: f32,
    /// Pitch rotation in radians (vertical)
    pub pitch: f32,
    /// Viewport size in pixels
    pub viewport: Vec2,
    /// Vertical field of view in radians
    pub fov_y: f32,
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            viewport: Vec2::new(1280.0, 720.0),
            fov_y: 70.0_f32.to_radians(),
        }
    }
}

impl CameraView {
    /// Unit vector the camera looks along
    pub fn forward(&self) -> Vec3 {
        Quat::from_euler(glam::EulerRot::YXZ, self.yaw, self.pitch, 0.0) * Vec3::NEG_Z
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    fn projection_matrix(&self) -> Mat4 {
        let aspect = self.viewport.x / self.viewport.y;
        Mat4::perspective_rh(self.fov_y, aspect, 0.05, 100.0)
    }

    /// Project a world point to window coordinates. Returns `None` for
    /// points behind the camera.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.projection_matrix() * self.view_matrix() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_ahead_projects_to_center() {
        let camera = CameraView::default();
        let screen = camera.project(Vec3::new(0.0, 0.0, -3.0)).unwrap();
        assert!((screen.x - 640.0).abs() < 0.5);
        assert!((screen.y - 360.0).abs() < 0.5);
    }

    #[test]
    fn test_point_behind_is_rejected() {
        let camera = CameraView::default();
        assert!(camera.project(Vec3::new(0.0, 0.0, 3.0)).is_none());
    }

    #[test]
    fn test_point_to_the_right_lands_right_of_center() {
        let camera = CameraView::default();
        let screen = camera.project(Vec3::new(1.0, 0.0, -3.0)).unwrap();
        assert!(screen.x > 640.0);
    }
}
