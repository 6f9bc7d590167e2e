//! Orbit camera with slow auto-rotation.

use glam::{Mat4, Vec3};

/// Auto-rotation at speed 1.0 completes one orbit per minute.
const AUTO_ROTATE_RADIANS_PER_SEC: f32 = std::f32::consts::TAU / 60.0;

/// Orbit camera looking at the center of the tree.
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Elevation above the horizon in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    /// Orbits per minute while idle; 0 disables auto-rotation.
    pub auto_rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Camera {
    /// Camera 20 units out, level with a target slightly above the tree's
    /// center, turning half an orbit per minute.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 20.0,
            target: Vec3::new(0.0, 1.0, 0.0),
            fov_y: 45.0,
            auto_rotate_speed: 0.5,
            min_distance: 10.0,
            max_distance: 30.0,
            min_pitch: -0.17,
            max_pitch: 0.52,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y.to_radians(), aspect, 0.1, 100.0);
        proj * self.view_matrix()
    }

    /// Rotate by a mouse drag, in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * 0.005;
        self.pitch = (self.pitch + dy * 0.005).clamp(self.min_pitch, self.max_pitch);
    }

    /// Move closer (positive) or further away (negative).
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance - amount).clamp(self.min_distance, self.max_distance);
    }

    /// Apply auto-rotation for `delta` seconds.
    pub fn update(&mut self, delta: f32) {
        self.yaw += AUTO_ROTATE_RADIANS_PER_SEC * self.auto_rotate_speed * delta;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
