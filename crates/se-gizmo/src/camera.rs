//! Orbit camera and the per-frame view context

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use crate::math::{Ray, ScreenPoint, Viewport, project, screen_to_ray};

/// Pitch stays this far inside the poles
const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;
/// World units per pixel of pan, per unit of distance
const PAN_SPEED: f32 = 0.002;
/// Exponential zoom rate per scroll unit
const ZOOM_SPEED: f32 = 0.1;
const MIN_DISTANCE: f32 = 0.1;
const MAX_DISTANCE: f32 = 10_000.0;
/// Closest a fit moves the camera
const MIN_FIT_DISTANCE: f32 = 1.0;
/// Extra room around a fitted sphere
const FIT_MARGIN: f32 = 1.2;

/// Preset camera orientations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPreset {
    /// Looking down -Y
    Top,
    /// Looking down -Z
    Front,
    /// Looking down -X
    Side,
}

impl ViewPreset {
    /// All presets, in toolbar order
    pub const ALL: [ViewPreset; 3] = [ViewPreset::Top, ViewPreset::Front, ViewPreset::Side];

    /// Toolbar label
    pub fn label(self) -> &'static str {
        match self {
            ViewPreset::Top => "Top",
            ViewPreset::Front => "Front",
            ViewPreset::Side => "Side",
        }
    }

    /// Orbit yaw and pitch in radians
    fn angles(self) -> (f32, f32) {
        match self {
            ViewPreset::Top => (0.0, PITCH_LIMIT),
            ViewPreset::Front => (0.0, 0.0),
            ViewPreset::Side => (std::f32::consts::FRAC_PI_2, 0.0),
        }
    }
}

/// Y-up orbit camera
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Eye position, derived from the orbit state
    pub position: Vec3,
    /// Point the camera orbits around
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Width / height
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
    /// Rotation about Y in radians, 0 looks down -Z
    pub yaw: f32,
    /// Elevation in radians
    pub pitch: f32,
    /// Distance from `target`
    pub distance: f32,
}

impl OrbitCamera {
    /// Create a camera on the +Z axis looking at the origin
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 50.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 1000.0,
            yaw: 0.0,
            pitch: 0.0,
            distance: 10.0,
        };
        camera.update_position();
        camera
    }

    /// Update aspect ratio
    pub fn update_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Orbit the camera around the target. Pitch stops just short of the
    /// poles so the up vector never lines up with the view direction.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.set_orbit(self.yaw + delta_yaw, self.pitch + delta_pitch);
    }

    /// Slide the target in the view plane. Deltas are in pixels; a pixel
    /// covers more world space the farther out the camera sits.
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let rotation = self.orbit_rotation();
        let step = self.distance * PAN_SPEED;
        self.target += rotation * Vec3::new(-delta_x * step, delta_y * step, 0.0);
        self.update_position();
    }

    /// Dolly toward (positive) or away from the target
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (-delta * ZOOM_SPEED).exp()).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.update_position();
    }

    /// Center a bounding sphere and back off until it fits the vertical
    /// field of view
    pub fn fit_all(&mut self, center: Vec3, radius: f32) {
        self.target = center;
        let half_fov = (self.fov * 0.5).max(f32::EPSILON);
        self.distance = (radius.max(0.0) * FIT_MARGIN / half_fov.sin()).clamp(MIN_FIT_DISTANCE, MAX_DISTANCE);
        self.update_position();
    }

    /// Jump to a preset view, keeping target and distance
    pub fn set_view(&mut self, preset: ViewPreset) {
        let (yaw, pitch) = preset.angles();
        self.set_orbit(yaw, pitch);
    }

    fn set_orbit(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_position();
    }

    /// Yaw about Y, then pitch about the camera's right axis
    fn orbit_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0)
    }

    fn update_position(&mut self) {
        self.position = self.target + self.orbit_rotation() * Vec3::new(0.0, 0.0, self.distance);
    }

    /// Unit vector from the camera toward the target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Get view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Projection * view
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Snapshot the matrices for the current frame
    pub fn view_context(&self, viewport: Viewport) -> ViewContext {
        ViewContext::new(self.view_projection_matrix(), self.position, viewport)
    }
}

/// Live camera state for one frame.
///
/// The host refreshes this once per frame and passes it by reference into
/// every pick, drag and draw call, so a camera orbited mid-drag is always
/// seen by the next pointer move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewContext {
    /// Projection times view
    pub view_proj: Mat4,
    /// Inverse of `view_proj`, for unprojecting the pointer
    pub inv_view_proj: Mat4,
    /// Eye position in world space
    pub camera_position: Vec3,
    /// Size of the drawing surface
    pub viewport: Viewport,
}

impl ViewContext {
    /// Create a context from a view-projection matrix
    pub fn new(view_proj: Mat4, camera_position: Vec3, viewport: Viewport) -> Self {
        Self {
            view_proj,
            inv_view_proj: view_proj.inverse(),
            camera_position,
            viewport,
        }
    }

    /// Project a world point
    pub fn project(&self, point: Vec3) -> ScreenPoint {
        project(point, &self.view_proj, self.viewport)
    }

    /// Ray through a pixel
    pub fn ray(&self, cursor: Vec2) -> Ray {
        screen_to_ray(
            cursor,
            self.viewport,
            &self.inv_view_proj,
            self.camera_position,
        )
    }

    /// Unit vector from `point` toward the camera (zero if they coincide)
    pub fn to_camera(&self, point: Vec3) -> Vec3 {
        (self.camera_position - point).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_camera_on_z_axis() {
        let camera = OrbitCamera::new(1.0);
        assert_abs_diff_eq!(camera.position.x, 0.0);
        assert_abs_diff_eq!(camera.position.y, 0.0);
        assert_abs_diff_eq!(camera.position.z, 10.0);
        assert!(camera.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = OrbitCamera::new(1.0);
        camera.orbit(0.0, 10.0);
        assert!(camera.pitch <= 89.0_f32.to_radians() + 1e-6);
    }

    #[test]
    fn test_zoom_keeps_target() {
        let mut camera = OrbitCamera::new(1.0);
        camera.zoom(2.0);
        let expected = 10.0 * (-0.2_f32).exp();
        assert_abs_diff_eq!(camera.distance, expected, epsilon = 1e-5);
        assert_abs_diff_eq!((camera.position - camera.target).length(), expected, epsilon = 1e-4);

        camera.zoom(-2.0);
        assert_abs_diff_eq!(camera.distance, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_presets_look_down_their_axis() {
        let mut camera = OrbitCamera::new(1.0);
        camera.orbit(0.8, -0.3);
        for (preset, forward) in [
            (ViewPreset::Front, Vec3::NEG_Z),
            (ViewPreset::Side, Vec3::NEG_X),
        ] {
            camera.set_view(preset);
            assert!(camera.forward().abs_diff_eq(forward, 1e-5), "{preset:?}");
        }
        camera.set_view(ViewPreset::Top);
        assert!(camera.forward().y < -0.99);
        assert_abs_diff_eq!(camera.distance, 10.0);
    }

    #[test]
    fn test_pan_moves_target_and_eye_together() {
        let mut camera = OrbitCamera::new(1.0);
        let offset = camera.position - camera.target;
        camera.pan(100.0, 0.0);
        // Dragging right slides the scene right, so the target moves left
        assert!(camera.target.x < 0.0);
        assert_abs_diff_eq!(camera.target.y, 0.0, epsilon = 1e-6);
        assert!((camera.position - camera.target).abs_diff_eq(offset, 1e-5));
    }

    #[test]
    fn test_fit_all_contains_sphere() {
        let mut camera = OrbitCamera::new(1.0);
        camera.fit_all(Vec3::new(1.0, 2.0, 3.0), 4.0);
        assert_eq!(camera.target, Vec3::new(1.0, 2.0, 3.0));
        // The sphere's angular radius stays inside half the field of view
        assert!((4.0 / camera.distance).asin() < camera.fov * 0.5);

        camera.fit_all(Vec3::ZERO, 0.0);
        assert_abs_diff_eq!(camera.distance, MIN_FIT_DISTANCE);
    }

    #[test]
    fn test_context_ray_through_center_hits_target() {
        let camera = OrbitCamera::new(4.0 / 3.0);
        let ctx = camera.view_context(Viewport::new(800.0, 600.0));
        let ray = ctx.ray(Vec2::new(400.0, 300.0));
        assert!(ray.direction.abs_diff_eq(camera.forward(), 1e-4));
    }
}
