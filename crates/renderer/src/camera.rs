//! Orbit camera: circles a target point, driven by mouse drags and the wheel.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// Keeps the camera from flipping over the poles.
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Perspective camera orbiting `target` at `distance`.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera looks at and orbits around.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Radians of rotation per pixel dragged.
    pub rotate_speed: f32,
    /// Exponential dolly rate per wheel pixel.
    pub zoom_speed: f32,
    /// Target travel per pixel dragged, as a fraction of `distance`.
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    distance: f32,
    /// Rotation around the world Y axis in radians. 0 looks down -Z.
    yaw: f32,
    /// Elevation above the target's horizontal plane in radians.
    pitch: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            fov_degrees: 50.0,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
            rotate_speed: 0.005,
            zoom_speed: 0.002,
            pan_speed: 0.001,
            min_distance: 0.5,
            max_distance: 500.0,
            distance: 10.0,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl OrbitCamera {
    /// Camera on the +Z axis, `distance` away from the origin.
    pub fn new(distance: f32, fov_degrees: f32) -> Self {
        let mut camera = Self {
            fov_degrees,
            ..Default::default()
        };
        camera.distance = distance.clamp(camera.min_distance, camera.max_distance);
        camera
    }

    /// Update aspect ratio (call on window resize). A zero-sized viewport
    /// (minimised window) keeps the previous aspect.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Orbit by a mouse drag in pixels. Dragging right swings the camera
    /// left around the target, dragging down raises it.
    pub fn rotate(&mut self, drag: Vec2) {
        self.yaw -= drag.x * self.rotate_speed;
        self.pitch = (self.pitch + drag.y * self.rotate_speed).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Dolly by wheel movement in pixels; positive moves closer.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance =
            (self.distance * (-scroll * self.zoom_speed).exp()).clamp(self.min_distance, self.max_distance);
    }

    /// Slide the target in the view plane by a mouse drag in pixels.
    pub fn pan(&mut self, drag: Vec2) {
        let scale = self.distance * self.pan_speed;
        self.target += (-self.right() * drag.x + self.up() * drag.y) * scale;
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    /// Get camera forward direction.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position()).normalize()
    }

    /// Get camera right direction.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    /// Get camera up direction.
    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Camera uniform data for GPU (matches `Camera` in the WGSL shaders).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4], // w unused, padding
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
        }
    }

    pub fn update(&mut self, camera: &OrbitCamera) {
        self.view_proj = camera.view_projection_matrix().to_cols_array_2d();
        let pos = camera.position();
        self.position = [pos.x, pos.y, pos.z, 1.0];
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_sits_on_positive_z() {
        let camera = OrbitCamera::new(10.0, 50.0);
        assert!((camera.position() - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-5);
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-5);
        assert!((camera.right() - Vec3::X).length() < 1e-5);
        assert!((camera.up() - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn rotation_keeps_distance_and_clamps_pitch() {
        let mut camera = OrbitCamera::new(10.0, 50.0);
        camera.rotate(Vec2::new(120.0, 10_000.0));
        assert!((camera.position().length() - 10.0).abs() < 1e-4);
        assert!(camera.pitch() <= MAX_PITCH);
        camera.rotate(Vec2::new(0.0, -100_000.0));
        assert!(camera.pitch() >= -MAX_PITCH);
    }

    #[test]
    fn zero_sized_viewport_keeps_aspect() {
        let mut camera = OrbitCamera::new(10.0, 50.0);
        camera.set_aspect(1600, 800);
        camera.set_aspect(0, 800);
        camera.set_aspect(1600, 0);
        assert_eq!(camera.aspect, 2.0);
        assert!(camera.projection_matrix().is_finite());
    }

    #[test]
    fn zoom_moves_closer_and_respects_limits() {
        let mut camera = OrbitCamera::new(10.0, 50.0);
        camera.zoom(100.0);
        assert!(camera.distance() < 10.0);
        camera.zoom(1e6);
        assert_eq!(camera.distance(), camera.min_distance);
        camera.zoom(-1e6);
        assert_eq!(camera.distance(), camera.max_distance);
    }

    #[test]
    fn pan_moves_target_in_view_plane() {
        let mut camera = OrbitCamera::new(10.0, 50.0);
        camera.pan(Vec2::new(100.0, 0.0));
        // Dragging right slides the scene right, so the target moves left.
        assert!(camera.target.x < 0.0);
        assert!(camera.target.y.abs() < 1e-5 && camera.target.z.abs() < 1e-5);
        // Still looking straight down -Z from 10 units away.
        assert!((camera.position() - camera.target - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn aspect_follows_viewport() {
        let mut camera = OrbitCamera::default();
        camera.set_aspect(1920, 1080);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
        camera.set_aspect(800, 0);
        assert_eq!(camera.aspect, 800.0);
    }

    #[test]
    fn target_projects_to_clip_center() {
        let mut camera = OrbitCamera::new(10.0, 50.0);
        camera.rotate(Vec2::new(40.0, -25.0));
        let clip = camera.view_projection_matrix() * camera.target.extend(1.0);
        assert!((clip.x / clip.w).abs() < 1e-4);
        assert!((clip.y / clip.w).abs() < 1e-4);
    }

    #[test]
    fn uniform_carries_position() {
        let camera = OrbitCamera::new(12.0, 50.0);
        let mut uniform = CameraUniform::new();
        uniform.update(&camera);
        assert_eq!(uniform.position, [0.0, 0.0, 12.0, 1.0]);
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }
}
